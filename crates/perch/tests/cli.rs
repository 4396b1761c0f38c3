use std::process::Command;

#[test]
fn help_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_perch"));
    cmd.arg("--help");

    // Act
    let output = cmd.output().expect("failed to execute perch");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("perched on the desktop"));
}

#[test]
fn version_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_perch"));
    cmd.arg("--version");

    // Act
    let output = cmd.output().expect("failed to execute perch");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("perch"));
}

#[test]
fn attach_help_lists_modes() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_perch"));
    cmd.args(["attach", "--help"]);

    // Act
    let output = cmd.output().expect("failed to execute perch");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--mode"));
    assert!(stdout.contains("desktop"));
    assert!(stdout.contains("style"));
}

#[test]
fn unknown_mode_is_rejected() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_perch"));
    cmd.args(["attach", "--mode", "floating"]);

    // Act
    let output = cmd.output().expect("failed to execute perch");

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("floating"));
}

#[test]
fn debug_help_lists_subcommands() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_perch"));
    cmd.args(["debug", "--help"]);

    // Act
    let output = cmd.output().expect("failed to execute perch");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("list"));
    assert!(stdout.contains("foreground"));
}
