use std::error::Error;
use std::fs;
use std::process::{Command, Output};
use tempfile::tempdir;

fn docperm_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_docperm"))
}

fn run(args: &[&str]) -> Result<Output, Box<dyn Error>> {
    Ok(docperm_command().args(args).output()?)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn cli_encode_decode_roundtrip() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("abc.txt");
    let output = dir.path().join("abc.out");
    fs::write(&input, b"ABC\n")?;

    let encode = run(&["encode", input.to_str().unwrap()])?;
    assert!(
        encode.status.success(),
        "encode command failed: {}",
        String::from_utf8_lossy(&encode.stderr)
    );
    assert_eq!(stdout(&encode), "4276803");

    let hex = run(&["encode", "--hex", input.to_str().unwrap()])?;
    assert_eq!(stdout(&hex), "414243");

    let decode = run(&["decode", "4276803", output.to_str().unwrap()])?;
    assert!(
        decode.status.success(),
        "decode command failed: {}",
        String::from_utf8_lossy(&decode.stderr)
    );
    assert_eq!(fs::read(&output)?, b"ABC");

    let bad = run(&["decode", "not-a-number", output.to_str().unwrap()])?;
    assert!(!bad.status.success());
    assert!(String::from_utf8(bad.stderr)?.contains("Invalid number"));

    Ok(())
}

#[test]
fn cli_rank_and_unrank() -> Result<(), Box<dyn Error>> {
    let rank = run(&["rank", "3,2,1,0", "--order", "lexicographic"])?;
    assert!(rank.status.success());
    assert_eq!(stdout(&rank), "23");

    let unrank = run(&["unrank", "0", "4", "--order", "lexicographic"])?;
    assert_eq!(stdout(&unrank), "0,1,2,3");

    let rank = run(&["rank", "4,1,0,3,2"])?;
    let unrank = run(&["unrank", &stdout(&rank), "5"])?;
    assert_eq!(stdout(&unrank), "4,1,0,3,2");

    let out_of_range = run(&["unrank", "24", "4"])?;
    assert!(!out_of_range.status.success());

    let duplicate = run(&["rank", "0,0,1"])?;
    assert!(!duplicate.status.success());
    assert!(String::from_utf8(duplicate.stderr)?.contains("more than once"));

    Ok(())
}

#[test]
fn cli_process_writes_artifacts() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");
    fs::write(&first, b"line one\nline two\n")?;
    fs::write(&second, b"another\r\ndocument")?;

    let process = run(&[
        "process",
        "--workers",
        "2",
        first.to_str().unwrap(),
        second.to_str().unwrap(),
    ])?;
    assert!(
        process.status.success(),
        "process command failed: {}",
        String::from_utf8_lossy(&process.stderr)
    );
    assert!(String::from_utf8(process.stdout)?.contains("Processed 2 files, 0 failed"));

    assert_eq!(
        fs::read(dir.path().join("outputfile_first.txt.txt"))?,
        b"line oneline two"
    );
    assert_eq!(
        fs::read(dir.path().join("outputfile_second.txt.txt"))?,
        b"anotherdocument"
    );

    Ok(())
}

#[test]
fn cli_process_reports_failures_per_file() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let good = dir.path().join("good.txt");
    let unsupported = dir.path().join("sheet.xlsx");
    let results = dir.path().join("results");
    fs::write(&good, b"fine")?;
    fs::write(&unsupported, b"cells")?;

    let process = run(&[
        "process",
        "--json",
        "--output-dir",
        results.to_str().unwrap(),
        good.to_str().unwrap(),
        unsupported.to_str().unwrap(),
    ])?;
    assert!(!process.status.success(), "a failed file should fail the run");

    let lines: Vec<serde_json::Value> = String::from_utf8(process.stdout)?
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["status"], "ok");
    assert_eq!(lines[0]["report"]["permutation_size"], 1000);
    assert_eq!(lines[1]["status"], "error");

    assert_eq!(fs::read(results.join("outputfile_good.txt.txt"))?, b"fine");

    Ok(())
}

#[test]
fn cli_process_strict_rank_with_config_file() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("long.txt");
    let config = dir.path().join("docperm.json");
    fs::write(&input, b"more than five factorial")?;
    fs::write(&config, r#"{ "permutation_size": 5, "workers": 1 }"#)?;

    let reduced = run(&["process", "--config", config.to_str().unwrap(), input.to_str().unwrap()])?;
    assert!(reduced.status.success());
    assert!(String::from_utf8(reduced.stdout)?.contains("rank reduced"));

    let strict = run(&[
        "process",
        "--config",
        config.to_str().unwrap(),
        "--strict-rank",
        input.to_str().unwrap(),
    ])?;
    assert!(!strict.status.success());
    assert!(String::from_utf8(strict.stdout)?.contains("Rank must be less than 5!"));

    Ok(())
}

#[test]
fn cli_process_refuses_to_overwrite_artifacts() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let results = dir.path().join("results");
    fs::create_dir_all(dir.path().join("a"))?;
    fs::create_dir_all(dir.path().join("b"))?;
    let first = dir.path().join("a").join("report.txt");
    let second = dir.path().join("b").join("report.txt");
    fs::write(&first, b"from a")?;
    fs::write(&second, b"from b")?;

    let process = run(&[
        "process",
        "--output-dir",
        results.to_str().unwrap(),
        first.to_str().unwrap(),
        second.to_str().unwrap(),
    ])?;
    assert!(!process.status.success());
    let stdout = String::from_utf8(process.stdout)?;
    assert!(stdout.contains("would overwrite the artifact of"));
    assert!(stdout.contains("Processed 2 files, 1 failed"));
    assert_eq!(fs::read(results.join("outputfile_report.txt.txt"))?, b"from a");

    Ok(())
}

#[test]
fn cli_version() -> Result<(), Box<dyn Error>> {
    let version = run(&["--version"])?;
    assert!(version.status.success());
    assert!(stdout(&version).starts_with("docperm "));
    Ok(())
}
