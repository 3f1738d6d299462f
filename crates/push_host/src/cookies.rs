//! Cookie read/write helpers over a `document.cookie`-style store.
//!
//! Reads scan the `;`-separated cookie string; writes assign one `name=value` cookie scoped to
//! `/`, with an expiry when a day count is given.

use std::{cell::RefCell, rc::Rc};

use chrono::{DateTime, Utc};

use crate::time::unix_time_ms_now;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const COOKIE_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Host cookie store with `document.cookie` semantics.
pub trait CookieStore {
    /// Returns the current cookie string (`a=1; b=2`).
    fn cookie_string(&self) -> Result<String, String>;

    /// Assigns one cookie (`name=value; expires=...; path=/`).
    fn assign(&self, cookie: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op cookie store for targets without a document.
pub struct NoopCookieStore;

impl CookieStore for NoopCookieStore {
    fn cookie_string(&self) -> Result<String, String> {
        Ok(String::new())
    }

    fn assign(&self, _cookie: &str) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory cookie jar emulating `document.cookie` assignment and read behavior.
pub struct MemoryCookieStore {
    jar: Rc<RefCell<Vec<(String, String)>>>,
}

impl CookieStore for MemoryCookieStore {
    fn cookie_string(&self) -> Result<String, String> {
        Ok(self
            .jar
            .borrow()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; "))
    }

    fn assign(&self, cookie: &str) -> Result<(), String> {
        let mut attributes = cookie.split(';');
        let pair = attributes.next().unwrap_or_default();
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("cookie `{pair}` has no `=`"))?;
        let name = name.trim().to_string();
        let expired = attributes
            .filter_map(|attr| attr.trim().strip_prefix("expires="))
            .filter_map(|raw| DateTime::parse_from_rfc2822(raw).ok())
            .any(|expires| expires.timestamp_millis() <= unix_time_ms_now() as i64);

        let mut jar = self.jar.borrow_mut();
        let existing = jar.iter().position(|(key, _)| *key == name);
        match (existing, expired) {
            (Some(index), true) => {
                jar.remove(index);
            }
            (Some(index), false) => jar[index].1 = value.to_string(),
            (None, true) => {}
            (None, false) => jar.push((name, value.to_string())),
        }
        Ok(())
    }
}

/// Formats a cookie assignment, with an expiry when `expires_at_ms` is given.
///
/// # Errors
///
/// Returns an error when the expiry lies outside the representable date range.
pub fn format_cookie(name: &str, value: &str, expires_at_ms: Option<i64>) -> Result<String, String> {
    let expires = match expires_at_ms {
        Some(ms) => {
            let date = DateTime::<Utc>::from_timestamp_millis(ms)
                .ok_or_else(|| format!("cookie expiry {ms} is out of range"))?;
            format!("; expires={}", date.format(COOKIE_DATE_FORMAT))
        }
        None => String::new(),
    };
    Ok(format!("{name}={value}{expires}; path=/"))
}

/// Writes `name=value` scoped to `/`, expiring `days` from `now_ms`.
///
/// A missing or zero day count writes a session cookie.
///
/// # Errors
///
/// Returns an error when the store rejects the assignment or the expiry is out of range.
pub fn write_cookie_at<S: CookieStore + ?Sized>(
    store: &S,
    name: &str,
    value: &str,
    days: Option<i64>,
    now_ms: i64,
) -> Result<(), String> {
    let expires_at_ms = days
        .filter(|days| *days != 0)
        .map(|days| now_ms.saturating_add(days.saturating_mul(DAY_MS)));
    store.assign(&format_cookie(name, value, expires_at_ms)?)
}

/// Writes `name=value` scoped to `/`, expiring `days` from now.
///
/// # Errors
///
/// Returns an error when the store rejects the assignment or the expiry is out of range.
pub fn write_cookie<S: CookieStore + ?Sized>(
    store: &S,
    name: &str,
    value: &str,
    days: Option<i64>,
) -> Result<(), String> {
    write_cookie_at(store, name, value, days, unix_time_ms_now() as i64)
}

/// Finds `name` in a cookie string, returning `""` when absent.
pub fn find_cookie(cookie_string: &str, name: &str) -> String {
    let prefix = format!("{name}=");
    cookie_string
        .split(';')
        .map(|entry| entry.trim_start_matches(' '))
        .find_map(|entry| entry.strip_prefix(prefix.as_str()))
        .unwrap_or_default()
        .to_string()
}

/// Reads `name` from the store, returning `""` when absent.
///
/// # Errors
///
/// Returns an error when the store cannot be read.
pub fn read_cookie<S: CookieStore + ?Sized>(store: &S, name: &str) -> Result<String, String> {
    Ok(find_cookie(&store.cookie_string()?, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips() {
        let store = MemoryCookieStore::default();
        write_cookie(&store, "session", "a1b2c3", Some(365)).expect("write");
        write_cookie(&store, "theme", "dark", None).expect("write");
        assert_eq!(read_cookie(&store, "session").expect("read"), "a1b2c3");
        assert_eq!(read_cookie(&store, "theme").expect("read"), "dark");
        assert_eq!(store.cookie_string().expect("string"), "session=a1b2c3; theme=dark");
    }

    #[test]
    fn missing_cookie_reads_empty() {
        assert_eq!(read_cookie(&MemoryCookieStore::default(), "session").expect("read"), "");
        assert_eq!(find_cookie("sessionid=1; other=2", "session"), "");
    }

    #[test]
    fn expiry_is_days_after_now_in_gmt() {
        let now_ms = 1_760_000_000_000;
        assert_eq!(
            format_cookie("session", "x", Some(now_ms + 2 * DAY_MS)).expect("format"),
            "session=x; expires=Sat, 11 Oct 2025 08:53:20 GMT; path=/"
        );
        let store = MemoryCookieStore::default();
        write_cookie_at(&store, "k", "v", Some(0), now_ms).expect("write");
        assert_eq!(read_cookie(&store, "k").expect("read"), "v");
        assert_eq!(format_cookie("k", "v", None).expect("format"), "k=v; path=/");
    }

    #[test]
    fn expired_assignment_removes_cookie() {
        let store = MemoryCookieStore::default();
        write_cookie(&store, "session", "old", None).expect("write");
        write_cookie(&store, "session", "old", Some(-1)).expect("expire");
        assert_eq!(read_cookie(&store, "session").expect("read"), "");
    }

    #[test]
    fn reader_trims_leading_spaces_only() {
        assert_eq!(find_cookie("a=1;   b=two words", "b"), "two words");
        assert_eq!(find_cookie("a=1;b=2", "b"), "2");
    }
}
