// Built Command

/// Argument vector for one tool run; `argv[0]` is the program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltCommand {
    argv: Vec<String>,
}

impl BuiltCommand {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    /// Arguments after the program name
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Value following `flag`, if present
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        self.argv
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.argv.get(i + 1))
            .map(String::as_str)
    }

    pub fn into_argv(self) -> Vec<String> {
        self.argv
    }
}

impl std::fmt::Display for BuiltCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.argv.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let cmd = BuiltCommand::new(
            ["dfleveldb", "log", "-s", "/e/000003.log", "-t", "blocks", "-o", "json"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        assert_eq!(cmd.program(), Some("dfleveldb"));
        assert_eq!(cmd.args().len(), 7);
        assert_eq!(cmd.flag_value("-s"), Some("/e/000003.log"));
        assert_eq!(cmd.flag_value("--format"), None);
        assert_eq!(cmd.to_string(), "dfleveldb log -s /e/000003.log -t blocks -o json");
    }

    #[test]
    fn test_empty_command() {
        let cmd = BuiltCommand::new(vec![]);
        assert_eq!(cmd.program(), None);
        assert!(cmd.args().is_empty());
    }
}
