//! Notification-area icon

use crate::menu::{MenuAction, MenuActions};
use gchat_core::TrayIconState;
use muda::{Menu, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

const ICON_SIZE: u32 = 32;
const TOOLTIP: &str = "Google Chat";

const GREEN: [f32; 3] = [0.0, 172.0, 71.0];
const GREY: [f32; 3] = [128.0, 134.0, 139.0];
const RED: [f32; 3] = [234.0, 67.0, 53.0];

/// Draw the tray glyph for `state` as RGBA pixels.
///
/// A rounded speech bubble, green while connected and grey when offline.
/// The badge variant adds a red dot in the top-right corner.
pub fn icon_rgba(state: TrayIconState) -> Vec<u8> {
    let size = ICON_SIZE as f32;
    let body = match state {
        TrayIconState::Offline => GREY,
        TrayIconState::Normal | TrayIconState::Badge => GREEN,
    };

    let mut data = Vec::with_capacity((ICON_SIZE * ICON_SIZE * 4) as usize);
    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);

            let in_badge = state == TrayIconState::Badge && {
                let (dx, dy) = (px - size * 0.78, py - size * 0.22);
                dx * dx + dy * dy <= (size * 0.2) * (size * 0.2)
            };

            // Bubble: rounded rectangle plus a tail at the bottom left
            let in_bubble = rounded_rect(px, py, 2.0, 3.0, size - 2.0, size - 9.0, 6.0)
                || (px >= 6.0 && px <= 14.0 && py >= size - 10.0 && py <= size - 2.0 && px - 6.0 <= size - 2.0 - py);

            let (rgb, alpha) = if in_badge {
                (RED, 255)
            } else if in_bubble {
                // Lighter stripes suggest text lines
                let on_line = (py - 10.0).abs() < 1.2 || (py - 16.0).abs() < 1.2;
                if on_line && px > 8.0 && px < size - 8.0 {
                    (lighten(body), 255)
                } else {
                    (body, 255)
                }
            } else {
                ([0.0, 0.0, 0.0], 0)
            };

            data.extend_from_slice(&[rgb[0] as u8, rgb[1] as u8, rgb[2] as u8, alpha]);
        }
    }
    data
}

fn lighten(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(|c| (c + (255.0 - c) * 0.75).min(255.0))
}

fn rounded_rect(px: f32, py: f32, left: f32, top: f32, right: f32, bottom: f32, radius: f32) -> bool {
    if px < left || px > right || py < top || py > bottom {
        return false;
    }
    let cx = px.clamp(left + radius, right - radius);
    let cy = py.clamp(top + radius, bottom - radius);
    let (dx, dy) = (px - cx, py - cy);
    dx * dx + dy * dy <= radius * radius
}

fn tray_icon_image(state: TrayIconState) -> anyhow::Result<Icon> {
    Ok(Icon::from_rgba(icon_rgba(state), ICON_SIZE, ICON_SIZE)?)
}

/// Window icon, the connected glyph
pub fn window_icon() -> Option<tao::window::Icon> {
    tao::window::Icon::from_rgba(icon_rgba(TrayIconState::Normal), ICON_SIZE, ICON_SIZE).ok()
}

fn tooltip(state: TrayIconState) -> String {
    match state {
        TrayIconState::Normal => TOOLTIP.to_string(),
        TrayIconState::Badge => format!("{} - unread messages", TOOLTIP),
        TrayIconState::Offline => format!("{} - offline", TOOLTIP),
    }
}

pub struct Tray {
    icon: TrayIcon,
    state: TrayIconState,
}

impl Tray {
    pub fn build(actions: &mut MenuActions, state: TrayIconState) -> anyhow::Result<Self> {
        let toggle = actions.item("Toggle", MenuAction::ToggleWindow, None);
        let quit = actions.item("Quit", MenuAction::Quit, None);
        let menu = Menu::with_items(&[&toggle, &PredefinedMenuItem::separator(), &quit])?;

        let icon = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_tooltip(tooltip(state))
            .with_icon(tray_icon_image(state)?)
            .build()?;

        Ok(Self { icon, state })
    }

    pub fn set_state(&mut self, state: TrayIconState) {
        if state == self.state {
            return;
        }

        match tray_icon_image(state) {
            Ok(image) => {
                if let Err(e) = self.icon.set_icon(Some(image)) {
                    tracing::warn!("Failed to update tray icon: {}", e);
                    return;
                }
            }
            Err(e) => {
                tracing::warn!("Failed to draw tray icon: {}", e);
                return;
            }
        }
        let _ = self.icon.set_tooltip(Some(tooltip(state)));
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(data: &[u8], x: u32, y: u32) -> [u8; 4] {
        let i = ((y * ICON_SIZE + x) * 4) as usize;
        [data[i], data[i + 1], data[i + 2], data[i + 3]]
    }

    #[test]
    fn test_icon_dimensions() {
        for state in [TrayIconState::Normal, TrayIconState::Badge, TrayIconState::Offline] {
            assert_eq!(icon_rgba(state).len(), (ICON_SIZE * ICON_SIZE * 4) as usize);
        }
    }

    #[test]
    fn test_states_are_distinguishable() {
        let normal = icon_rgba(TrayIconState::Normal);
        let badge = icon_rgba(TrayIconState::Badge);
        let offline = icon_rgba(TrayIconState::Offline);

        assert_ne!(normal, badge);
        assert_ne!(normal, offline);

        // Badge dot in the top-right corner
        assert_eq!(pixel(&badge, 25, 7), [234, 67, 53, 255]);
        assert_ne!(pixel(&normal, 25, 7), [234, 67, 53, 255]);
    }

    #[test]
    fn test_corners_are_transparent() {
        let data = icon_rgba(TrayIconState::Normal);
        assert_eq!(pixel(&data, 0, 0)[3], 0);
        assert_eq!(pixel(&data, ICON_SIZE - 1, ICON_SIZE - 1)[3], 0);
    }

    #[test]
    fn test_tooltip_mentions_state() {
        assert_eq!(tooltip(TrayIconState::Normal), "Google Chat");
        assert!(tooltip(TrayIconState::Offline).contains("offline"));
        assert!(tooltip(TrayIconState::Badge).contains("unread"));
    }
}
