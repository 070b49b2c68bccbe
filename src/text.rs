//! Body normalization and sanity checks applied before matching

use std::borrow::Cow;

use unicode_normalization::{is_nfc_quick, IsNormalized, UnicodeNormalization};

use crate::error::AnalysisError;
use crate::models::{MediaType, Message};

/// Normalize a body for matching: NFC composition and ASCII quotes.
///
/// Returns the input unchanged (borrowed) in the common case of plain ASCII.
#[must_use]
pub fn normalize(body: &str) -> Cow<'_, str> {
    let needs_quotes = body.contains(['\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}']);
    let needs_nfc = !matches!(is_nfc_quick(body.chars()), IsNormalized::Yes);

    if !needs_quotes && !needs_nfc {
        return Cow::Borrowed(body);
    }

    let composed: String = if needs_nfc { body.nfc().collect() } else { body.to_string() };
    Cow::Owned(
        composed
            .chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                other => other,
            })
            .collect(),
    )
}

/// Return the classifiable body of a message.
///
/// `Ok(None)` means there is legitimately nothing to classify (media-only or
/// blank). An error means the message is malformed: a text message with no
/// body, or a body carrying replacement characters or control bytes left
/// behind by a broken decoder.
pub fn classifiable_body(message: &Message) -> Result<Option<&str>, AnalysisError> {
    let Some(body) = message.body.as_deref() else {
        if message.media_type == MediaType::Text {
            return Err(AnalysisError::MalformedMessage {
                message_id: message.id,
                reason: "text message has no body".to_string(),
            });
        }
        return Ok(None);
    };

    if body.contains('\u{FFFD}')
        || body
            .chars()
            .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
    {
        return Err(AnalysisError::MalformedMessage {
            message_id: message.id,
            reason: "body contains invalid encoding".to_string(),
        });
    }

    Ok(message.text_body())
}

/// Byte range of the sentence containing `offset`.
///
/// Sentences end at runs of `.`, `!` or `?`.
#[must_use]
pub fn sentence_around(text: &str, offset: usize) -> std::ops::Range<usize> {
    let is_end = |c: char| matches!(c, '.' | '!' | '?');

    let start = text[..offset]
        .rfind(is_end)
        .map_or(0, |i| i + 1);
    let end = text[offset..]
        .find(is_end)
        .map_or(text.len(), |i| offset + i);

    start..end
}
