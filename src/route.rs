//! Navigation routes and deep links
//!
//! The client has two screens: the map, and the map with one station's
//! detail modal on top. A station route is shareable as a link carrying
//! `?id=<stationId>&name=<displayName>`.

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Map,
    Station {
        id: String,
        /// Display name supplied by whoever opened the route (may be empty)
        name: String,
    },
}

impl Route {
    pub fn station(id: impl Into<String>, name: impl Into<String>) -> Self {
        Route::Station {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Parse a deep link.
    ///
    /// Accepts a full URL, a path such as `/?id=..` or `/station?id=..`, or a
    /// bare query string (`id=..&name=..`, with or without the leading `?`).
    /// Anything without a non-empty `id` is the map.
    ///
    /// # Examples
    /// ```
    /// use kelitui::route::Route;
    ///
    /// assert_eq!(Route::parse("/?id=5&name=Foo"), Route::station("5", "Foo"));
    /// assert_eq!(Route::parse("https://keli.example/?id=C01503"), Route::station("C01503", ""));
    /// assert_eq!(Route::parse("/"), Route::Map);
    /// ```
    pub fn parse(link: &str) -> Self {
        let link = link.trim();

        // Drop scheme and host
        let rest = match link.split_once("://") {
            Some((_, after)) => match after.find(['/', '?']) {
                Some(pos) => &after[pos..],
                None => "",
            },
            None => link,
        };

        let query = match rest.split_once('?') {
            Some((_, query)) => query,
            None if rest.contains('=') && !rest.starts_with('/') => rest,
            None => "",
        };
        // Fragments are not part of the route
        let query = query.split('#').next().unwrap_or("");

        let mut id = None;
        let mut name = None;
        for pair in query.split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "id" if id.is_none() => id = Some(decode(value)),
                "name" if name.is_none() => name = Some(decode(value)),
                _ => {}
            }
        }

        match id {
            Some(id) if !id.trim().is_empty() => Route::Station {
                id,
                name: name.unwrap_or_default(),
            },
            _ => Route::Map,
        }
    }

    /// Shareable link for this route under `base`
    ///
    /// # Examples
    /// ```
    /// use kelitui::route::Route;
    ///
    /// let route = Route::station("C01503", "Vt4 Oulu");
    /// assert_eq!(
    ///     route.to_link("https://keli.example"),
    ///     "https://keli.example/?id=C01503&name=Vt4%20Oulu"
    /// );
    /// ```
    pub fn to_link(&self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        match self {
            Route::Map => format!("{}/", base),
            Route::Station { id, name } => format!(
                "{}/?id={}&name={}",
                base,
                urlencoding::encode(id),
                urlencoding::encode(name)
            ),
        }
    }

    pub fn station_id(&self) -> Option<&str> {
        match self {
            Route::Map => None,
            Route::Station { id, .. } => Some(id),
        }
    }
}

/// Decode a query component (`+` means space)
fn decode(value: &str) -> String {
    let value = value.replace('+', " ");
    match urlencoding::decode(&value) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_station_path() {
        assert_eq!(
            Route::parse("/station?id=C04507&name=Kuopio"),
            Route::station("C04507", "Kuopio")
        );
    }

    #[test]
    fn test_parse_bare_query() {
        assert_eq!(Route::parse("id=5&name=Foo"), Route::station("5", "Foo"));
        assert_eq!(Route::parse("?id=5"), Route::station("5", ""));
    }

    #[test]
    fn test_parse_decodes_name() {
        assert_eq!(
            Route::parse("/?id=1&name=Vt4%20Oulu%2C+Kempele"),
            Route::station("1", "Vt4 Oulu, Kempele")
        );
    }

    #[test]
    fn test_missing_or_empty_id_is_map() {
        assert_eq!(Route::parse(""), Route::Map);
        assert_eq!(Route::parse("/?name=Foo"), Route::Map);
        assert_eq!(Route::parse("/?id=&name=Foo"), Route::Map);
        assert_eq!(Route::parse("https://keli.example"), Route::Map);
    }

    #[test]
    fn test_first_id_wins_and_fragment_ignored() {
        assert_eq!(Route::parse("/?id=A&id=B#top"), Route::station("A", ""));
    }

    #[test]
    fn test_link_roundtrip_keeps_special_characters() {
        let route = Route::station("C 1&2", "Ääkkönen / tie?");
        let link = route.to_link("https://keli.example/");
        assert_eq!(Route::parse(&link), route);
    }

    #[test]
    fn test_map_link() {
        assert_eq!(Route::Map.to_link("https://keli.example/"), "https://keli.example/");
    }
}
