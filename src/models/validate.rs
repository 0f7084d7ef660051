//! Field validators shared by create and update inputs.
//!
//! Every check here runs before any storage access.

use crate::constants::*;
use crate::error::{AppError, Result};

pub fn latitude(value: f64) -> Result<()> {
    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&value) {
        return Err(AppError::validation(ERR_LATITUDE_RANGE));
    }
    Ok(())
}

pub fn longitude(value: f64) -> Result<()> {
    if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&value) {
        return Err(AppError::validation(ERR_LONGITUDE_RANGE));
    }
    Ok(())
}

/// Title length is counted in characters, not bytes
pub fn title(value: &str) -> Result<()> {
    let len = value.chars().count();
    if len == 0 || len > MAX_TITLE_LEN {
        return Err(AppError::validation(ERR_TITLE_LENGTH));
    }
    Ok(())
}

/// `#RRGGBB`, case-insensitive
pub fn color(value: &str) -> Result<()> {
    match value.strip_prefix('#') {
        Some(digits) if digits.len() == 6 && hex::decode(digits).is_ok() => Ok(()),
        _ => Err(AppError::validation(ERR_COLOR_FORMAT)),
    }
}

pub fn zoom(value: i32) -> Result<()> {
    if !(MIN_ZOOM..=MAX_ZOOM).contains(&value) {
        return Err(AppError::validation(ERR_ZOOM_RANGE));
    }
    Ok(())
}

pub fn username(value: &str) -> Result<()> {
    let len = value.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(AppError::validation(ERR_USERNAME_LENGTH));
    }
    Ok(())
}

pub fn email(value: &str) -> Result<()> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(AppError::validation(ERR_EMAIL_FORMAT));
    }
    Ok(())
}

pub fn avatar_url(value: &str) -> Result<()> {
    match reqwest::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        _ => Err(AppError::validation(ERR_AVATAR_URL)),
    }
}
