//! Minimal ordered `style` attribute handling for the legacy conversions.
//!
//! [§ 3 Syntax of CSS rules in HTML's style attribute](https://www.w3.org/TR/css-style-attr/#syntax)

/// Declarations of a `style` attribute in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclarations {
    declarations: Vec<(String, String)>,
}

impl StyleDeclarations {
    /// Parse `prop: value; ...`. Property names are lower-cased; malformed
    /// declarations are skipped.
    #[must_use]
    pub fn parse(style: &str) -> Self {
        let mut parsed = Self::default();
        for declaration in style.split(';') {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            let (name, value) = (name.trim(), value.trim());
            if name.is_empty() || value.is_empty() {
                continue;
            }
            parsed.set(&name.to_ascii_lowercase(), value);
        }
        parsed
    }

    /// Look up a property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set a property, keeping its position if already present.
    pub fn set(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.declarations.iter_mut().find(|(key, _)| key == name) {
            value.clone_into(&mut entry.1);
        } else {
            self.declarations.push((name.to_string(), value.to_string()));
        }
    }

    /// Returns true if there are no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Serialize as `prop: value;` pairs separated by spaces.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
