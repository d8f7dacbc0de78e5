use std::collections::HashMap;

/// Fills `{key}` placeholders in a static template.
pub struct MessageBuilder {
    template: &'static str,
    vars: HashMap<&'static str, String>,
}

impl MessageBuilder {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            vars: HashMap::new(),
        }
    }

    pub fn var(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.vars.insert(key, value.into());
        self
    }

    /// Placeholders with no matching variable are left untouched.
    pub fn build(self) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => {
                    let key = &after[..close];
                    match self.vars.get(key) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push('{');
                            out.push_str(key);
                            out.push('}');
                        }
                    }
                    rest = &after[close + 1..];
                }
                None => {
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_known_placeholders() {
        let text = MessageBuilder::new("{count} annotations enabled for {tool}")
            .var("count", "3")
            .var("tool", "haplotype-caller")
            .build();
        assert_eq!(text, "3 annotations enabled for haplotype-caller");
    }

    #[test]
    fn test_keeps_unknown_placeholders() {
        let text = MessageBuilder::new("{a} and {b}").var("a", "x").build();
        assert_eq!(text, "x and {b}");
    }

    #[test]
    fn test_value_containing_braces_is_not_rescanned() {
        let text = MessageBuilder::new("{a}{b}")
            .var("a", "{b}")
            .var("b", "!")
            .build();
        assert_eq!(text, "{b}!");
    }
}
