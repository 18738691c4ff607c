//! Client labels in the supported languages

use crate::registry::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Copied,
    CopyUrl,
    Bookmarked,
    Bookmark,
    Updated,
    ViewDetails,
    Report,
    Reporting,
    Reported,
    ReportFailed,
    NotOperational,
    Loading,
    LoadFailed,
    NoCameras,
    Menu,
    Bookmarks,
    NoBookmarks,
    MapStyle,
    Language,
    ClearAll,
    ConfirmClear,
    Search,
    Stations,
}

/// Text of `label` in `language`
pub fn t(language: Language, label: Label) -> &'static str {
    match language {
        Language::En => english(label),
        Language::Fi => finnish(label),
    }
}

fn english(label: Label) -> &'static str {
    match label {
        Label::Copied => "Copied!",
        Label::CopyUrl => "Copy link",
        Label::Bookmarked => "Bookmarked",
        Label::Bookmark => "Bookmark",
        Label::Updated => "Updated",
        Label::ViewDetails => "View details",
        Label::Report => "Something's happening here",
        Label::Reporting => "Sending...",
        Label::Reported => "Thanks for the report!",
        Label::ReportFailed => "Report failed",
        Label::NotOperational => "This station is currently not operational",
        Label::Loading => "Loading...",
        Label::LoadFailed => "Failed to load",
        Label::NoCameras => "No cameras",
        Label::Menu => "Menu",
        Label::Bookmarks => "Bookmarks",
        Label::NoBookmarks => "No bookmarked stations",
        Label::MapStyle => "Map style",
        Label::Language => "Language",
        Label::ClearAll => "Clear all",
        Label::ConfirmClear => "Remove all bookmarks? (y/n)",
        Label::Search => "Search",
        Label::Stations => "stations",
    }
}

fn finnish(label: Label) -> &'static str {
    match label {
        Label::Copied => "Kopioitu!",
        Label::CopyUrl => "Kopioi linkki",
        Label::Bookmarked => "Kirjanmerkeissä",
        Label::Bookmark => "Lisää kirjanmerkki",
        Label::Updated => "Päivitetty",
        Label::ViewDetails => "Näytä tiedot",
        Label::Report => "Täällä tapahtuu jotain",
        Label::Reporting => "Lähetetään...",
        Label::Reported => "Kiitos ilmoituksesta!",
        Label::ReportFailed => "Ilmoitus epäonnistui",
        Label::NotOperational => "Asema ei ole tällä hetkellä toiminnassa",
        Label::Loading => "Ladataan...",
        Label::LoadFailed => "Lataus epäonnistui",
        Label::NoCameras => "Ei kameroita",
        Label::Menu => "Valikko",
        Label::Bookmarks => "Kirjanmerkit",
        Label::NoBookmarks => "Ei kirjanmerkkejä",
        Label::MapStyle => "Kartan tyyli",
        Label::Language => "Kieli",
        Label::ClearAll => "Tyhjennä",
        Label::ConfirmClear => "Poistetaanko kaikki kirjanmerkit? (y/n)",
        Label::Search => "Haku",
        Label::Stations => "asemaa",
    }
}
