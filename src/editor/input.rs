/// Primary (left) pointer button.
pub const BUTTON_PRIMARY: u8 = 0;
/// Auxiliary (middle/wheel) pointer button.
pub const BUTTON_AUXILIARY: u8 = 1;

/// Pointer press, move or release in client (screen) coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerInput {
    pub button: u8,
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerInput {
    pub fn new(button: u8, client_x: f64, client_y: f64) -> Self {
        Self {
            button,
            client_x,
            client_y,
        }
    }

    pub fn primary(client_x: f64, client_y: f64) -> Self {
        Self::new(BUTTON_PRIMARY, client_x, client_y)
    }

    pub fn auxiliary(client_x: f64, client_y: f64) -> Self {
        Self::new(BUTTON_AUXILIARY, client_x, client_y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WheelInput {
    pub delta_y: f64,
}

/// Keyboard event with the modifier state the layer controller reacts to.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KeyInput {
    pub key: String,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_alt(mut self, alt: bool) -> Self {
        self.alt = alt;
        self
    }

    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    /// `Enter` or `Escape`, which end a keyboard-driven edit.
    pub fn is_commit_or_cancel(&self) -> bool {
        matches!(self.key.as_str(), "Enter" | "Escape")
    }
}

/// System cursor over the edit surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cursor {
    #[default]
    Default,
    /// Hidden while a glyph is drawn in its place.
    Hidden,
}

impl Cursor {
    /// CSS `cursor` value.
    pub fn as_css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Hidden => "none",
        }
    }
}
