mod common;

use common::{fixture_odt, fixture_odt_with, write_fixture};
use odftools::container;
use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::tempdir;

fn odftools() -> Command {
    Command::new(env!("CARGO_BIN_EXE_odftools"))
}

#[test]
fn test_cli_help() {
    let output = odftools()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("--list-authors"));
}

#[test]
fn test_cli_prints_text() {
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path(), "fixture.odt");

    let output = odftools().arg(&path).output().expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        [
            "Test document",
            "This sentence serves for test purposes.",
            "Cell & value"
        ]
    );
}

#[test]
fn test_cli_lists_authors_of_a_directory() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path(), "a.odt");
    write_fixture(dir.path(), "b.odt");
    fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

    let output = odftools()
        .arg("--list-authors")
        .arg(dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Jane Roe");
    assert!(lines[1].ends_with("a.odt"));
    assert!(lines[2].ends_with("b.odt"));
}

#[test]
fn test_cli_replace_writes_new_package() {
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path(), "fixture.odt");
    let out = dir.path().join("replaced.odt");

    let status = odftools()
        .args(["-r", "purposes", "tests", "-o"])
        .arg(&out)
        .arg(&path)
        .status()
        .expect("Failed to execute command");

    assert!(status.success());
    let doc = container::load(&out).unwrap();
    assert!(doc.to_text(true).contains("test tests."));
    let original = container::load(&path).unwrap();
    assert!(original.to_text(true).contains("test purposes."));
}

#[test]
fn test_cli_does_not_overwrite_input_without_force() {
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path(), "fixture.odt");
    let before = fs::read(&path).unwrap();

    let status = odftools()
        .args(["-r", "purposes", "tests"])
        .arg(&path)
        .status()
        .expect("Failed to execute command");
    assert!(status.success());
    assert_eq!(fs::read(&path).unwrap(), before);

    let status = odftools()
        .args(["-r", "purposes", "tests", "--force"])
        .arg(&path)
        .status()
        .expect("Failed to execute command");
    assert!(status.success());
    assert!(container::load(&path)
        .unwrap()
        .to_text(true)
        .contains("test tests."));
}

#[test]
fn test_cli_writes_html_into_directory() {
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path(), "fixture.odt");
    let out_dir = dir.path().join("out");
    fs::create_dir(&out_dir).unwrap();

    let status = odftools()
        .args(["--to", "html", "-d"])
        .arg(&out_dir)
        .arg(&path)
        .status()
        .expect("Failed to execute command");

    assert!(status.success());
    let html = fs::read_to_string(out_dir.join("fixture.html")).unwrap();
    assert!(html.contains("<title>fixture.odt</title>"));
}

#[test]
fn test_cli_extracts_pictures() {
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path(), "fixture.odt");
    let out_dir = dir.path().join("pictures");
    fs::create_dir(&out_dir).unwrap();

    let status = odftools()
        .args(["--extract", "*.gif", "-d"])
        .arg(&out_dir)
        .arg(&path)
        .status()
        .expect("Failed to execute command");

    assert!(status.success());
    let mut names: Vec<String> = fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["100_A.gif", "100_B.gif"]);
}

#[test]
fn test_cli_fails_on_broken_input() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.odt");
    fs::write(&path, b"not a zip").unwrap();

    let output = odftools().arg(&path).output().expect("Failed to execute command");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("broken.odt"));
}

#[test]
fn test_cli_extract_keeps_members_inside_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("evil.odt");
    let outside: &[u8] = b"outside";
    fs::write(
        &path,
        fixture_odt_with(&[
            ("Pictures/../escaped.png", outside),
            ("Pictures/../../escaped.png", outside),
            ("Pictures//tmp/absolute.png", outside),
        ]),
    )
    .unwrap();
    let out_dir = dir.path().join("a").join("out");
    fs::create_dir_all(&out_dir).unwrap();

    let output = odftools()
        .args(["--extract", "*", "-d"])
        .arg(&out_dir)
        .arg(&path)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(!dir.path().join("a").join("escaped.png").exists());
    assert!(!dir.path().join("escaped.png").exists());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsafe name"));

    let mut names: Vec<String> = fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["100_A.gif", "100_B.gif", "200_C.png"]);
}

#[test]
fn test_cli_reads_document_from_stdin() {
    let mut child = odftools()
        .arg("--stdin")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to execute command");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(&fixture_odt())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().next(), Some("Test document"));
}

#[test]
fn test_cli_stdin_package_goes_to_output_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("from-stdin.odt");

    let mut child = odftools()
        .args(["--stdin", "-r", "purposes", "tests", "-o"])
        .arg(&out)
        .stdin(Stdio::piped())
        .spawn()
        .expect("Failed to execute command");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(&fixture_odt())
        .unwrap();
    assert!(child.wait().unwrap().success());

    let doc = container::load(&out).unwrap();
    assert!(doc.to_text(true).contains("test tests."));
}

#[test]
fn test_cli_extension_append_and_replace() {
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path(), "fixture.odt");

    let status = odftools()
        .args(["--to", "html", "--extension-append"])
        .arg(&path)
        .status()
        .expect("Failed to execute command");
    assert!(status.success());
    let html = fs::read_to_string(dir.path().join("fixture.odt.html")).unwrap();
    assert!(html.contains("<title>fixture.odt</title>"));

    let status = odftools()
        .args(["--extension-replace"])
        .arg(&path)
        .status()
        .expect("Failed to execute command");
    assert!(status.success());
    let text = fs::read_to_string(dir.path().join("fixture.txt")).unwrap();
    assert!(text.starts_with("Test document"));

    let status = odftools()
        .args(["-r", "purposes", "tests", "--extension-append"])
        .arg(&path)
        .status()
        .expect("Failed to execute command");
    assert!(status.success());
    let doc = container::load(dir.path().join("fixture.odt.odt")).unwrap();
    assert!(doc.to_text(true).contains("test tests."));
}

#[test]
fn test_cli_extension_flags_conflict() {
    let output = odftools()
        .args(["--extension-append", "--extension-replace", "x.odt"])
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
}
