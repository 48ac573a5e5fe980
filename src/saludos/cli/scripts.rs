//! The demo commands shipped with the binary.
//!
//! Each builder returns a [`CommandSpec`]; the bodies print straight to
//! stdout since they are the terminal client's own commands.

use super::launch::launch;
use saludos::app::App;
use saludos::config::AppConfig;
use saludos::error::{Abort, SpecError};
use saludos::prelude::*;
use tracing::info;

const CONFIG_PANEL: &str = "Config";
const LANGUAGES: [&str; 3] = ["es", "en", "pt"];

pub fn build_app(config: &AppConfig) -> Result<App, SpecError> {
    App::new("saludos")
        .about("Pequeños comandos de ejemplo: saludos, despedidas y algo más.")
        .confirm_attempts(config.confirm_attempts)
        .command(saludo())?
        .command(despedida())?
        .command(usuarios())?
        .command(scrapy())?
        .command(lanzar(&config.image))?
        .command(registro())
}

fn saludo() -> CommandSpec {
    CommandSpec::new("saludo")
        .about("Saluda a alguien por su nombre.")
        .param(ParameterSpec::argument("name").help("A quién saludar"))
        .body(|args| {
            println!("¡Hola, {}!", args.get_str("name").unwrap_or_default());
            Ok(())
        })
}

fn despedida() -> CommandSpec {
    CommandSpec::new("despedida")
        .about("Se despide, con o sin formalidades.")
        .param(ParameterSpec::argument("name"))
        .param(ParameterSpec::flag("formal").help("Despedida formal"))
        .body(|args| {
            let name = args.get_str("name").unwrap_or_default();
            if args.get_bool("formal") {
                println!("¡Buenas noches, Sr./Sra. {}!", name);
            } else {
                println!("¡Hasta luego, {}!", name);
            }
            Ok(())
        })
}

fn usuarios() -> CommandSpec {
    CommandSpec::new("usuarios")
        .about("Procesa una lista de usuarios.")
        .param(
            ParameterSpec::option("user")
                .multiple()
                .help("Usuario a procesar (repetible)")
                .help_panel(CONFIG_PANEL),
        )
        .body(|args| {
            let users = args.get_strings("user");
            if users.is_empty() {
                println!("No provided users");
                return Err(Abort::default());
            }
            for user in users {
                println!("Processing user: {}", user);
            }
            Ok(())
        })
}

fn scrapy() -> CommandSpec {
    CommandSpec::new("scrapy")
        .about("Numera las URLs recibidas.")
        .param(ParameterSpec::argument("urls").multiple())
        .body(|args| {
            for (idx, url) in args.get_strings("urls").iter().enumerate() {
                println!("{}   {}", idx + 1, url);
            }
            Ok(())
        })
}

fn lanzar(image: &str) -> CommandSpec {
    CommandSpec::new("lanzar")
        .about("Abre la imagen configurada con el visor del sistema.")
        .param(ParameterSpec::flag("locate").help("Abrir la carpeta que la contiene"))
        .param(
            ParameterSpec::option("image")
                .default(image)
                .help("Archivo a abrir")
                .help_panel(CONFIG_PANEL),
        )
        .body(|args| {
            let image = args.get_str("image").unwrap_or_default();
            let locate = args.get_bool("locate");
            info!(image, locate, "launching");
            launch(image, locate).map_err(|e| Abort::new(format!("No se pudo abrir {}: {}", image, e)))
        })
}

fn registro() -> CommandSpec {
    CommandSpec::new("registro")
        .about("Registra un usuario de forma interactiva.")
        .param(
            ParameterSpec::option("name")
                .short('n')
                .required()
                .env("SALUDOS_NAME")
                .prompt("Nombre")
                .help("Nombre del usuario"),
        )
        .param(
            ParameterSpec::option("password")
                .required()
                .prompt("Contraseña")
                .confirmation_prompt("Repite la contraseña")
                .hide_input()
                .help("Contraseña (nunca se muestra)"),
        )
        .param(
            ParameterSpec::option("age")
                .value_type(ValueType::Integer)
                .default(18i64)
                .help("Edad en años")
                .validate(check_age),
        )
        .param(
            ParameterSpec::option("lang")
                .default("es")
                .help("Idioma del saludo")
                .choices(|_, prefix| {
                    LANGUAGES
                        .iter()
                        .filter(|l| l.starts_with(prefix))
                        .map(|l| l.to_string())
                        .collect()
                })
                .validate(check_lang),
        )
        .body(|args| {
            let name = args.get_str("name").unwrap_or_default();
            let age = args.get_int("age").unwrap_or_default();
            let greeting = match args.get_str("lang") {
                Some("en") => "Welcome",
                Some("pt") => "Bem-vindo",
                _ => "Bienvenido",
            };
            println!("{}, {} ({} años). Registro completo.", greeting, name, age);
            Ok(())
        })
}

fn check_age(value: Value) -> Result<Value, Abort> {
    match value.as_int() {
        Some(age) if (0..=150).contains(&age) => Ok(value),
        _ => Err(Abort::new(format!("Edad fuera de rango: {}", value))),
    }
}

fn check_lang(value: Value) -> Result<Value, Abort> {
    match value.as_str() {
        Some(lang) if LANGUAGES.contains(&lang) => Ok(value),
        _ => Err(Abort::new(format!(
            "Idioma no soportado: {} (usa {})",
            value,
            LANGUAGES.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn app() -> App {
        build_app(&AppConfig::default()).unwrap()
    }

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_demo_commands_register() {
        let app = app();
        let names: Vec<&str> = app.commands().iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["saludo", "despedida", "usuarios", "scrapy", "lanzar", "registro"]
        );
    }

    #[test]
    fn test_usuarios_without_users_aborts() {
        let app = app();
        let result = app
            .dispatch(&tokens(&["usuarios"]), &HashMap::new(), &mut ScriptedInput::empty())
            .unwrap();
        assert_eq!(result, Dispatch::Aborted(Abort::new("Aborted!")));
    }

    #[test]
    fn test_registro_age_out_of_range_aborts() {
        let app = app();
        let env = HashMap::from([("SALUDOS_NAME".to_string(), "Ana".to_string())]);
        let mut input = ScriptedInput::new(["secreto", "secreto"]);
        let failure = app
            .dispatch(&tokens(&["registro", "--age", "200"]), &env, &mut input)
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::AbortedByCallback);
        assert_eq!(failure.parameter.as_deref(), Some("age"));
    }

    #[test]
    fn test_registro_rejects_unknown_language() {
        let app = app();
        let mut input = ScriptedInput::new(["x", "x"]);
        let failure = app
            .dispatch(
                &tokens(&["registro", "-n", "Ana", "--lang", "fr"]),
                &HashMap::new(),
                &mut input,
            )
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::AbortedByCallback);
    }

    #[test]
    fn test_lanzar_defaults_to_configured_image() {
        let config = AppConfig {
            image: "foto.png".to_string(),
            ..AppConfig::default()
        };
        let app = build_app(&config).unwrap();
        let image = app
            .find("lanzar")
            .and_then(|c| c.params().iter().find(|p| p.name() == "image"))
            .and_then(|p| p.default_value().cloned());
        assert_eq!(image, Some(Value::from("foto.png")));
    }
}
