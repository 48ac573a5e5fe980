use saludos::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn tokens(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn greet() -> CommandSpec {
    CommandSpec::new("greet")
        .param(ParameterSpec::argument("name"))
        .param(ParameterSpec::flag("loud").short('l'))
}

fn resolved(outcome: Result<Outcome, Failure>) -> ResolvedArgs {
    match outcome {
        Ok(Outcome::Resolved(args)) => args,
        other => panic!("expected resolved values, got {:?}", other),
    }
}

#[test]
fn test_name_and_loud_flag() {
    let env = HashMap::new();
    let cmd = greet();

    let args = resolved(resolve(&cmd, &tokens(&["Ana"]), &env, &mut ScriptedInput::empty()));
    assert_eq!(args.get_str("name"), Some("Ana"));
    assert!(!args.get_bool("loud"));

    let args = resolved(resolve(
        &cmd,
        &tokens(&["Ana", "--loud"]),
        &env,
        &mut ScriptedInput::empty(),
    ));
    assert!(args.get_bool("loud"));

    let failure = resolve(&cmd, &tokens(&["--loud"]), &env, &mut ScriptedInput::empty()).unwrap_err();
    assert_eq!(failure.kind, FailureKind::MissingRequired);
    assert_eq!(failure.parameter.as_deref(), Some("name"));
}

#[test]
fn test_env_supplies_missing_argument() {
    let cmd = CommandSpec::new("greet").param(ParameterSpec::argument("name").env("NAME"));
    let env = HashMap::from([("NAME".to_string(), "Luz".to_string())]);

    let args = resolved(resolve(&cmd, &[], &env, &mut ScriptedInput::empty()));
    assert_eq!(args.get_str("name"), Some("Luz"));
}

#[test]
fn test_token_beats_env() {
    let cmd = CommandSpec::new("greet").param(ParameterSpec::argument("name").env("NAME"));
    let env = HashMap::from([("NAME".to_string(), "Luz".to_string())]);

    let args = resolved(resolve(&cmd, &tokens(&["Sol"]), &env, &mut ScriptedInput::empty()));
    assert_eq!(args.get_str("name"), Some("Sol"));
}

#[test]
fn test_optional_only_command_uses_defaults() {
    let cmd = CommandSpec::new("settings")
        .param(ParameterSpec::option("times").value_type(ValueType::Integer).default(3i64))
        .param(ParameterSpec::flag("quiet"))
        .param(ParameterSpec::option("user").multiple());

    let args = resolved(resolve(&cmd, &[], &HashMap::new(), &mut ScriptedInput::empty()));
    assert_eq!(args.get_int("times"), Some(3));
    assert!(!args.get_bool("quiet"));
    assert!(args.get_strings("user").is_empty());
}

#[test]
fn test_confirmation_value_passes_through_callback() {
    let cmd = CommandSpec::new("login").param(
        ParameterSpec::option("password")
            .confirmation_prompt("Repeat")
            .hide_input()
            .validate(|v| Ok(Value::from(v.to_string().to_uppercase()))),
    );
    let mut input = ScriptedInput::new(["abc", "abc"]);

    let args = resolved(resolve(&cmd, &[], &HashMap::new(), &mut input));
    assert_eq!(args.get_str("password"), Some("ABC"));
    assert_eq!(input.asked().len(), 2);
    assert!(input.asked().iter().all(|(_, hidden)| *hidden));
}

#[test]
fn test_confirmation_mismatch() {
    let cmd = CommandSpec::new("login")
        .param(ParameterSpec::option("password").confirmation_prompt("Repeat"));
    let mut input = ScriptedInput::new(["abc", "abd"]);

    let failure = resolve(&cmd, &[], &HashMap::new(), &mut input).unwrap_err();
    assert_eq!(failure.kind, FailureKind::MismatchedConfirmation);
}

#[test]
fn test_eager_option_stops_everything_else() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let cmd = CommandSpec::new("greet")
        .param(ParameterSpec::argument("name").callback(move |v| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(Flow::Continue(v))
        }))
        .param(
            ParameterSpec::flag("version")
                .eager()
                .callback(|v| match v.as_bool() {
                    Some(true) => Ok(Flow::exit_with("greet 1.0")),
                    _ => Ok(Flow::Continue(v)),
                }),
        );

    let outcome = resolve(
        &cmd,
        &tokens(&["Ana", "--version"]),
        &HashMap::new(),
        &mut ScriptedInput::empty(),
    )
    .unwrap();
    assert_eq!(outcome, Outcome::Exited(Some("greet 1.0".to_string())));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_app_help_is_eager() {
    let app = App::new("demo").command(greet()).unwrap();
    let result = app
        .dispatch(&tokens(&["greet", "--help"]), &HashMap::new(), &mut ScriptedInput::empty())
        .unwrap();
    match result {
        Dispatch::Exited(Some(text)) => {
            assert!(text.starts_with("Usage: demo greet [OPTIONS] NAME"));
            assert!(text.contains("--loud / --no-loud"));
        }
        other => panic!("expected help, got {:?}", other),
    }
}

#[test]
fn test_resilient_mode_never_fails() {
    let cmd = greet().param(
        ParameterSpec::option("secret")
            .required()
            .prompt("Secret")
            .callback(|_| Err(Abort::new("nope"))),
    );
    let mut input = ScriptedInput::empty();
    let env = HashMap::new();
    let outcome = Resolver::new(&env, &mut input)
        .with_mode(Mode::Resilient)
        .resolve(&cmd, &tokens(&["--secret", "x", "--bogus"]))
        .unwrap();
    let args = match outcome {
        Outcome::Resolved(args) => args,
        other => panic!("unexpected {:?}", other),
    };
    assert_eq!(args.get_str("secret"), Some("x"));
    assert!(!args.contains("name"));
    assert!(input.asked().is_empty());
}
