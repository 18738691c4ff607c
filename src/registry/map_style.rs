use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use super::{PreferenceValue, Setting};

/// Basemap variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStyle {
    #[default]
    Bright,
    Dark,
}

impl MapStyle {
    pub const ALL: [MapStyle; 2] = [MapStyle::Bright, MapStyle::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            MapStyle::Bright => "bright",
            MapStyle::Dark => "dark",
        }
    }

    /// Slippy-map tile template for this style
    pub fn tile_url(&self) -> &'static str {
        match self {
            MapStyle::Bright => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            MapStyle::Dark => "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
        }
    }

    /// Attribution line for the tile provider
    pub fn attribution(&self) -> &'static str {
        match self {
            MapStyle::Bright => "© OpenStreetMap contributors",
            MapStyle::Dark => "© OpenStreetMap contributors © CARTO",
        }
    }
}

/// Colours the map canvas is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub coastline: Color,
    pub station: Color,
    pub cluster: Color,
    pub interesting: Color,
    pub location: Color,
    pub crosshair: Color,
}

impl MapStyle {
    pub fn palette(&self) -> Palette {
        match self {
            MapStyle::Bright => Palette {
                background: Color::Rgb(242, 239, 233),
                coastline: Color::Rgb(110, 140, 170),
                station: Color::Rgb(30, 90, 200),
                cluster: Color::Rgb(0, 120, 90),
                interesting: Color::Rgb(220, 60, 30),
                location: Color::Rgb(150, 0, 170),
                crosshair: Color::Black,
            },
            MapStyle::Dark => Palette {
                background: Color::Rgb(20, 22, 26),
                coastline: Color::Rgb(90, 96, 110),
                station: Color::Rgb(110, 170, 255),
                cluster: Color::Rgb(80, 200, 160),
                interesting: Color::Rgb(255, 120, 60),
                location: Color::Rgb(230, 120, 255),
                crosshair: Color::White,
            },
        }
    }
}

impl PreferenceValue for MapStyle {
    const KEY: &'static str = "mapType";

    fn next(self) -> Self {
        match self {
            MapStyle::Bright => MapStyle::Dark,
            MapStyle::Dark => MapStyle::Bright,
        }
    }
}

pub type MapStyleRegistry = Setting<MapStyle>;
