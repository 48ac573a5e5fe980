use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Runs the binary against an isolated config directory.
fn saludos(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("saludos").unwrap();
    cmd.env("SALUDOS_CONFIG_DIR", config_dir.path())
        .env_remove("SALUDOS_NAME")
        .env_remove("SALUDOS_LOG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_saludo() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .args(["saludo", "Ana"])
        .assert()
        .success()
        .stdout("¡Hola, Ana!\n");
}

#[test]
fn test_despedida_formal_and_negated() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .args(["despedida", "--formal", "Ana"])
        .assert()
        .success()
        .stdout("¡Buenas noches, Sr./Sra. Ana!\n");

    saludos(&dir)
        .args(["despedida", "Ana", "--no-formal"])
        .assert()
        .success()
        .stdout("¡Hasta luego, Ana!\n");
}

#[test]
fn test_usuarios() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .args(["usuarios", "--user", "ana", "--user=luz"])
        .assert()
        .success()
        .stdout("Processing user: ana\nProcessing user: luz\n");
}

#[test]
fn test_usuarios_without_users_aborts() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .arg("usuarios")
        .assert()
        .code(1)
        .stdout("No provided users\n")
        .stderr(predicate::str::contains("Aborted!"))
        .stderr(predicate::str::contains("No provided users").not());
}

#[test]
fn test_scrapy_numbers_urls() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .args(["scrapy", "a.com", "b.org"])
        .assert()
        .success()
        .stdout("1   a.com\n2   b.org\n");
}

#[test]
fn test_missing_argument_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .arg("saludo")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage: saludos saludo [OPTIONS] NAME"))
        .stderr(predicate::str::contains("Try 'saludos saludo --help' for help."))
        .stderr(predicate::str::contains("Error: Missing argument 'NAME'."));
}

#[test]
fn test_unknown_option_and_command() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .args(["saludo", "Ana", "--loud"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No such option: --loud"));

    saludos(&dir)
        .arg("adios")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No such command 'adios'."));
}

#[test]
fn test_missing_command() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Missing command."));
}

#[test]
fn test_command_help_wins_over_bad_tokens() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .args(["saludo", "--bogus", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Usage: saludos saludo [OPTIONS] NAME"))
        .stdout(predicate::str::contains("Arguments"))
        .stdout(predicate::str::contains("--help"));
}

#[test]
fn test_help_panel_for_usuarios() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .args(["usuarios", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config"))
        .stdout(predicate::str::contains("--user TEXT"));
}

#[test]
fn test_top_level_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands"))
        .stdout(predicate::str::contains("registro"))
        .stdout(predicate::str::contains("--no-color"))
        .stdout(predicate::str::contains("__complete").not());
}

#[test]
fn test_version() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_registro_from_piped_prompts() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .arg("registro")
        .write_stdin("Ana\nsecreto\nsecreto\n")
        .assert()
        .success()
        .stdout("Bienvenido, Ana (18 años). Registro completo.\n")
        .stderr(predicate::str::contains("Nombre: "))
        .stderr(predicate::str::contains("Repite la contraseña: "));
}

#[test]
fn test_registro_name_from_env() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .env("SALUDOS_NAME", "Luz")
        .args(["registro", "--lang", "pt", "--age", "30"])
        .write_stdin("s\ns\n")
        .assert()
        .success()
        .stdout("Bem-vindo, Luz (30 años). Registro completo.\n")
        .stderr(predicate::str::contains("Nombre").not());
}

#[test]
fn test_registro_confirmation_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .args(["registro", "--name", "Ana"])
        .write_stdin("uno\ndos\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("The two entered values do not match."));
}

#[test]
fn test_registro_confirm_attempts_from_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{"confirm_attempts": 2}"#).unwrap();
    saludos(&dir)
        .args(["registro", "--name", "Ana"])
        .write_stdin("uno\ndos\ntres\ntres\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bienvenido, Ana"));
}

#[test]
fn test_registro_closed_input_aborts() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .arg("registro")
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Aborted!"));
}

#[test]
fn test_registro_invalid_age() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .args(["registro", "-n", "Ana", "--age", "muchos"])
        .write_stdin("s\ns\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Invalid value for '--age': 'muchos' is not a valid integer.",
        ));

    saludos(&dir)
        .args(["registro", "-n", "Ana", "--age", "151"])
        .write_stdin("s\ns\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Edad fuera de rango: 151"));
}

#[test]
fn test_broken_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), "{ not json").unwrap();
    saludos(&dir)
        .args(["saludo", "Ana"])
        .assert()
        .success()
        .stdout("¡Hola, Ana!\n");
}

#[test]
fn test_complete_command_names() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .args(["__complete", "--", "sal"])
        .assert()
        .success()
        .stdout("saludo\n");
}

#[test]
fn test_complete_option_choices() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .args(["__complete", "--", "registro", "--lang", ""])
        .assert()
        .success()
        .stdout("es\nen\npt\n");

    saludos(&dir)
        .args(["__complete", "--", "registro", "--lang=e"])
        .assert()
        .success()
        .stdout("--lang=es\n--lang=en\n");
}

#[test]
fn test_complete_flags() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .args(["__complete", "--", "despedida", "Ana", "--no"])
        .assert()
        .success()
        .stdout("--no-formal\n");
}

#[test]
fn test_completion_scripts() {
    let dir = tempfile::tempdir().unwrap();
    saludos(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete -o default -F _saludos saludos"));

    saludos(&dir)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef saludos"));
}
