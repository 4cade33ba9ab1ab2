use assert_cmd::Command;

#[test]
fn help_lists_the_serve_command() {
    let mut cmd = Command::cargo_bin("folio-cli").unwrap();
    let assert = cmd.arg("--help").assert();
    let output = assert.success().get_output().stdout.clone();
    let help = String::from_utf8(output).unwrap();
    assert!(help.contains("serve"));
    assert!(help.contains("config"));
}
