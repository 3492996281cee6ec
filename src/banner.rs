//! ASCII banner rendering

use figlet_rs::FIGfont;

use crate::{Error, Result};

/// Render text as a FIGlet banner
///
/// # Errors
///
/// Returns error if the embedded font fails to load or the text cannot be
/// converted (e.g. unsupported characters)
pub fn render(text: &str) -> Result<String> {
    let font = FIGfont::standard().map_err(Error::Banner)?;
    let figure = font
        .convert(text)
        .ok_or_else(|| Error::Banner(format!("cannot render banner text '{text}'")))?;
    Ok(figure.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_multiline_art() {
        let art = render("hi").unwrap();
        assert!(art.lines().count() > 1);
    }

    #[test]
    fn art_is_not_blank() {
        let art = render("Arch").unwrap();
        assert!(art.chars().any(|c| !c.is_whitespace()));
    }
}
