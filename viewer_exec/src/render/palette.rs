//! Named color roles of a control

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::collections::BTreeMap;

use super::Color;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Maps the roles a control draws with (e.g. `"path"`) to colors.
///
/// The set of roles is fixed when the palette is built; only the colors of
/// existing roles can be changed afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    colors: BTreeMap<String, Color>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum PaletteError {
    #[error("No color role named \"{0}\" is defined")]
    UndefinedRole(String),

    #[error("\"{0}\" is not a color name of the form #rrggbb")]
    InvalidColorName(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Palette {
    /// Add a role with its default color.
    pub fn with(mut self, role: &str, color: Color) -> Self {
        self.colors.insert(role.to_string(), color);
        self
    }

    pub fn get(&self, role: &str) -> Result<Color, PaletteError> {
        self.colors
            .get(role)
            .copied()
            .ok_or_else(|| PaletteError::UndefinedRole(role.to_string()))
    }

    /// Color of a role, or black if the role is not defined.
    pub fn color(&self, role: &str) -> Color {
        self.get(role).unwrap_or(Color::BLACK)
    }

    pub fn set(&mut self, role: &str, color: Color) -> Result<(), PaletteError> {
        match self.colors.get_mut(role) {
            Some(c) => {
                *c = color;
                Ok(())
            }
            None => Err(PaletteError::UndefinedRole(role.to_string())),
        }
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.colors.keys().map(|r| r.as_str())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_roles() {
        let mut palette = Palette::default()
            .with("path", Color::RED)
            .with("axes", Color::GREEN);

        assert_eq!(palette.get("path"), Ok(Color::RED));
        assert_eq!(palette.roles().collect::<Vec<_>>(), vec!["axes", "path"]);

        palette.set("path", Color::BLUE).unwrap();
        assert_eq!(palette.color("path"), Color::BLUE);

        assert_eq!(
            palette.set("ground", Color::BLUE),
            Err(PaletteError::UndefinedRole("ground".into()))
        );
        assert_eq!(palette.color("ground"), Color::BLACK);
    }
}
