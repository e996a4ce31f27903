//! A call-site observed inside a Node's body.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Callee short name, e.g. `run` in both `run()` and `obj.run()`.
    pub token: String,
    /// The receiver/module the call was made on, e.g. `obj` in `obj.run()`.
    pub owner_token: Option<String>,
    pub line_number: u32,
}

impl Call {
    pub fn new(token: impl Into<String>, owner_token: Option<String>, line_number: u32) -> Self {
        Call {
            token: token.into(),
            owner_token,
            line_number,
        }
    }

    pub fn is_attr(&self) -> bool {
        self.owner_token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_call_is_not_attr() {
        let c = Call::new("run", None, 3);
        assert!(!c.is_attr());
    }

    #[test]
    fn attr_call_reports_owner() {
        let c = Call::new("run", Some("obj".to_string()), 3);
        assert!(c.is_attr());
        assert_eq!(c.owner_token.as_deref(), Some("obj"));
    }
}
