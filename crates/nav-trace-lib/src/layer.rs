//! Map layers and their colors
//!
//! A [`Layer`] pairs one parsed path with presentation state (name, color,
//! visibility) and lets interested parties observe visibility changes.
//! [`Color`] is an HSLA value object; hex conversion goes through RGB both
//! ways so `from_hex(c.to_hex())` is stable up to rounding.

use crate::path::PathVariant;
use crate::{ParseError, Result};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique layer identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerId(u64);

impl LayerId {
    fn next() -> Self {
        Self(NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

/// Handle for removing a registered visibility listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// An HSLA color. Hue is in degrees (0..=360), saturation and lightness are
/// percentages (0..=100), alpha is 0..=1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    hue: f64,
    saturation: f64,
    lightness: f64,
    alpha: f64,
}

impl Color {
    pub fn new(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Result<Self> {
        if !(0.0..=360.0).contains(&hue) {
            return Err(ParseError::InvalidColor(format!(
                "Hue must be between 0 and 360, but it's {hue}"
            )));
        }
        if !(0.0..=100.0).contains(&saturation) {
            return Err(ParseError::InvalidColor(format!(
                "Percentage must be between 0 and 100, but it's {saturation}"
            )));
        }
        if !(0.0..=100.0).contains(&lightness) {
            return Err(ParseError::InvalidColor(format!(
                "Percentage must be between 0 and 100, but it's {lightness}"
            )));
        }
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ParseError::InvalidColor(format!(
                "Alpha must be between 0 and 1, but it's {alpha}"
            )));
        }
        Ok(Self {
            hue,
            saturation,
            lightness,
            alpha,
        })
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let valid_length = digits.len() == 6 || digits.len() == 8;
        if !valid_length || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseError::InvalidColor(format!(
                "Invalid hex color format: {hex}"
            )));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).unwrap_or(0) as f64 / 255.0
        };
        let r = channel(0..2);
        let g = channel(2..4);
        let b = channel(4..6);
        let alpha = if digits.len() == 8 { channel(6..8) } else { 1.0 };

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let lightness = (max + min) / 2.0;

        let (hue, saturation) = if max == min {
            (0.0, 0.0)
        } else {
            let d = max - min;
            let s = if lightness > 0.5 {
                d / (2.0 - max - min)
            } else {
                d / (max + min)
            };
            let h = if max == r {
                (g - b) / d + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / d + 2.0
            } else {
                (r - g) / d + 4.0
            };
            (h / 6.0, s)
        };

        Self::new(
            (hue * 360.0).round(),
            (saturation * 100.0).round(),
            (lightness * 100.0).round(),
            alpha,
        )
    }

    #[inline]
    pub fn hue(&self) -> f64 {
        self.hue
    }

    #[inline]
    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    #[inline]
    pub fn lightness(&self) -> f64 {
        self.lightness
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// CSS `hsla(...)` form.
    pub fn to_hsla(&self) -> String {
        format!(
            "hsla({}, {}%, {}%, {})",
            self.hue, self.saturation, self.lightness, self.alpha
        )
    }

    /// `#RRGGBBAA` form.
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb();
        let a = (self.alpha * 255.0).round() as u8;
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }

    fn to_rgb(&self) -> (u8, u8, u8) {
        let h = self.hue / 360.0;
        let s = self.saturation / 100.0;
        let l = self.lightness / 100.0;

        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_rgb(p, q, h + 1.0 / 3.0),
                hue_to_rgb(p, q, h),
                hue_to_rgb(p, q, h - 1.0 / 3.0),
            )
        };
        (
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
        )
    }

    /// Adjustments clamp into the valid range instead of failing, so a theme
    /// can lighten an already-bright color without caring.
    pub fn lighten(&self, amount: f64) -> Self {
        Self {
            lightness: (self.lightness + amount).clamp(0.0, 100.0),
            ..*self
        }
    }

    pub fn darken(&self, amount: f64) -> Self {
        self.lighten(-amount)
    }

    pub fn saturate(&self, amount: f64) -> Self {
        Self {
            saturation: (self.saturation + amount).clamp(0.0, 100.0),
            ..*self
        }
    }

    pub fn desaturate(&self, amount: f64) -> Self {
        self.saturate(-amount)
    }

    pub fn with_alpha(&self, alpha: f64) -> Result<Self> {
        Self::new(self.hue, self.saturation, self.lightness, alpha)
    }
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

type VisibilityListener = Box<dyn Fn(bool) + Send + Sync>;

/// One displayable path with its presentation state.
pub struct Layer {
    id: LayerId,
    name: String,
    color: Color,
    visible: bool,
    path: PathVariant,
    listeners: Vec<(ListenerId, VisibilityListener)>,
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("color", &self.color)
            .field("visible", &self.visible)
            .field("path", &self.path.name())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Layer {
    /// New layers start visible, named after their path.
    pub fn new(color: Color, path: PathVariant) -> Self {
        Self {
            id: LayerId::next(),
            name: path.name().to_string(),
            color,
            visible: true,
            path,
            listeners: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> LayerId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn path(&self) -> &PathVariant {
        &self.path
    }

    /// No-op (and no notification) when the visibility does not change.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.notify();
        }
    }

    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
        self.notify();
    }

    /// Register a visibility listener; the returned id removes it again.
    pub fn add_visibility_listener(
        &mut self,
        listener: impl Fn(bool) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId::next();
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_visibility_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(self.visible);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{Path, PathVariant};
    use crate::point::Coordinates;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn sample_path() -> PathVariant {
        let point = Coordinates::new(52.0, 4.0).unwrap();
        PathVariant::Geo(Path::new(vec![point], "Point 1"))
    }

    #[test]
    fn test_color_validation() {
        assert!(Color::new(361.0, 50.0, 50.0, 1.0).is_err());
        assert!(Color::new(0.0, 101.0, 50.0, 1.0).is_err());
        assert!(Color::new(0.0, 50.0, -1.0, 1.0).is_err());
        assert!(Color::new(0.0, 50.0, 50.0, 1.5).is_err());
        assert!(Color::new(360.0, 100.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn test_from_hex() {
        // Pure red is hsl(0, 100%, 50%)
        let red = Color::from_hex("#ff0000").unwrap();
        assert_eq!(red.hue(), 0.0);
        assert_eq!(red.saturation(), 100.0);
        assert_eq!(red.lightness(), 50.0);
        assert_eq!(red.alpha(), 1.0);

        let translucent = Color::from_hex("ff000080").unwrap();
        assert!((translucent.alpha() - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn test_hex_round_trip() {
        for hex in ["#ff0000ff", "#00ff00ff", "#336699ff", "#808080ff"] {
            let color = Color::from_hex(hex).unwrap();
            assert_eq!(color.to_hex(), hex);
        }
    }

    #[test]
    fn test_to_hsla() {
        let color = Color::new(120.0, 50.0, 40.0, 1.0).unwrap();
        assert_eq!(color.to_hsla(), "hsla(120, 50%, 40%, 1)");
    }

    #[test]
    fn test_adjustments_clamp() {
        let color = Color::new(0.0, 95.0, 95.0, 1.0).unwrap();
        assert_eq!(color.lighten(20.0).lightness(), 100.0);
        assert_eq!(color.darken(200.0).lightness(), 0.0);
        assert_eq!(color.saturate(20.0).saturation(), 100.0);
        assert_eq!(color.desaturate(200.0).saturation(), 0.0);
    }

    #[test]
    fn test_layer_starts_visible_with_path_name() {
        let layer = Layer::new(Color::from_hex("#ff0000").unwrap(), sample_path());
        assert!(layer.is_visible());
        assert_eq!(layer.name(), "Point 1");
    }

    #[test]
    fn test_layer_ids_are_unique() {
        let color = Color::from_hex("#ff0000").unwrap();
        let a = Layer::new(color, sample_path());
        let b = Layer::new(color, sample_path());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_set_visible_notifies_only_on_change() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut layer = Layer::new(Color::from_hex("#ff0000").unwrap(), sample_path());
        {
            let seen = seen.clone();
            layer.add_visibility_listener(move |visible| seen.lock().unwrap().push(visible));
        }

        layer.set_visible(true); // already visible, no notification
        layer.set_visible(false);
        layer.toggle_visibility();
        assert_eq!(*seen.lock().unwrap(), vec![false, true]);
    }

    #[test]
    fn test_removed_listener_stops_receiving() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut layer = Layer::new(Color::from_hex("#ff0000").unwrap(), sample_path());
        let id = {
            let count = count.clone();
            layer.add_visibility_listener(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };

        layer.toggle_visibility();
        layer.remove_visibility_listener(id);
        layer.toggle_visibility();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
