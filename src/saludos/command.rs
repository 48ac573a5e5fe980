use crate::args::ResolvedArgs;
use crate::error::{Abort, SpecError};
use crate::param::ParameterSpec;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

pub type Body = Arc<dyn Fn(&ResolvedArgs) -> Result<(), Abort> + Send + Sync>;

/// A named command: its ordered parameters and the body that runs on success.
#[derive(Clone)]
pub struct CommandSpec {
    name: String,
    about: Option<String>,
    params: Vec<ParameterSpec>,
    body: Option<Body>,
}

impl CommandSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            about: None,
            params: Vec::new(),
            body: None,
        }
    }

    pub fn about(mut self, text: &str) -> Self {
        self.about = Some(text.to_string());
        self
    }

    pub fn param(mut self, param: ParameterSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn body<F>(mut self, f: F) -> Self
    where
        F: Fn(&ResolvedArgs) -> Result<(), Abort> + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn about_text(&self) -> Option<&str> {
        self.about.as_deref()
    }

    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    pub fn get_body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    pub fn positionals(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.params.iter().filter(|p| p.is_positional())
    }

    pub fn named(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.params.iter().filter(|p| !p.is_positional())
    }

    /// Checks the declaration rules. Run once at registration.
    pub fn validate(&self) -> Result<(), SpecError> {
        let command = self.name.clone();

        let mut names = HashSet::new();
        let mut flags = HashSet::new();
        for param in &self.params {
            if !names.insert(param.name()) {
                return Err(SpecError::DuplicateName {
                    command,
                    name: param.name().to_string(),
                });
            }
            for flag in param.flags() {
                if !flags.insert(flag.clone()) {
                    return Err(SpecError::DuplicateFlag { command, flag });
                }
            }
            if param.is_eager() && (param.is_positional() || param.get_callback().is_none()) {
                return Err(SpecError::InvalidEager {
                    command,
                    name: param.name().to_string(),
                });
            }
            if param.is_positional() && param.is_bool() {
                return Err(SpecError::BoolPositional {
                    command,
                    name: param.name().to_string(),
                });
            }
        }

        let positionals: Vec<&ParameterSpec> = self.positionals().collect();
        let mut seen_default = false;
        for (i, param) in positionals.iter().enumerate() {
            if param.is_multiple() && i + 1 != positionals.len() {
                return Err(SpecError::VariadicNotLast {
                    command,
                    name: param.name().to_string(),
                });
            }
            if param.default_value().is_some() {
                seen_default = true;
            } else if seen_default {
                return Err(SpecError::PositionalOrder {
                    command,
                    name: param.name().to_string(),
                });
            }
        }

        Ok(())
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("about", &self.about)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::Flow;

    #[test]
    fn test_valid_command() {
        let cmd = CommandSpec::new("despedida")
            .param(ParameterSpec::argument("name"))
            .param(ParameterSpec::flag("formal"));
        assert!(cmd.validate().is_ok());
    }

    #[test]
    fn test_rejects_positional_without_default_after_default() {
        let cmd = CommandSpec::new("x")
            .param(ParameterSpec::argument("first").default("a"))
            .param(ParameterSpec::argument("second"));
        assert!(matches!(
            cmd.validate(),
            Err(SpecError::PositionalOrder { name, .. }) if name == "second"
        ));
    }

    #[test]
    fn test_rejects_duplicate_names_and_flags() {
        let cmd = CommandSpec::new("x")
            .param(ParameterSpec::option("a"))
            .param(ParameterSpec::option("a"));
        assert!(matches!(cmd.validate(), Err(SpecError::DuplicateName { .. })));

        let cmd = CommandSpec::new("x")
            .param(ParameterSpec::option("a").short('v'))
            .param(ParameterSpec::option("b").short('v'));
        assert!(matches!(
            cmd.validate(),
            Err(SpecError::DuplicateFlag { flag, .. }) if flag == "-v"
        ));
    }

    #[test]
    fn test_rejects_variadic_before_other_positionals() {
        let cmd = CommandSpec::new("x")
            .param(ParameterSpec::argument("urls").multiple())
            .param(ParameterSpec::argument("out"));
        assert!(matches!(cmd.validate(), Err(SpecError::VariadicNotLast { .. })));
    }

    #[test]
    fn test_eager_needs_callback_and_name() {
        let cmd = CommandSpec::new("x").param(ParameterSpec::flag("version").eager());
        assert!(matches!(cmd.validate(), Err(SpecError::InvalidEager { .. })));

        let cmd = CommandSpec::new("x").param(
            ParameterSpec::flag("version")
                .eager()
                .callback(|_| Ok(Flow::exit())),
        );
        assert!(cmd.validate().is_ok());
    }
}
