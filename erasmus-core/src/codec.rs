/// Compact, URL-safe encoding of a [`SharedState`].
///
/// Wire format (version 1):
///
/// ```text
/// envelope  = base64url(zstd(composite))
/// composite = city "~" stay "~" budget "~" flights "~" scholarship
/// budget    = category ("," category){7}         canonical category order
/// flights   = "" | flight (";" flight)*
/// flight    = id "|" price "|" description "|" date "|" shared
/// ```
///
/// Numbers are the 8 big-endian bytes of an `f64` in base64url (11 chars),
/// booleans are `1`/`0` and strings carry a one-letter tag (`r` raw, `z` zstd)
/// followed by base64url. None of the sub-encoders can emit a separator.
///
/// Decoding never panics: a broken envelope yields `None`, a broken field
/// falls back to that field's default.

use crate::types::{
    AccommodationParameter, BudgetParameters, ExpenseCategory, ExpenseParameter, Flight,
    ScholarshipConfig, SharedState,
};
use crate::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use tracing::debug;

const SECTION_SEP: &str = "~";
const CATEGORY_SEP: &str = ",";
const FIELD_SEP: &str = ":";
const FLIGHT_SEP: &str = ";";
const FLIGHT_FIELD_SEP: &str = "|";
const SCHOLARSHIP_SEP: &str = ",";

const TAG_RAW: char = 'r';
const TAG_ZSTD: char = 'z';

/// zstd level for both the envelope and individual strings
pub const COMPRESSION_LEVEL: i32 = 19;

/// Upper bound on any decompressed payload, guards against zstd bombs
pub const MAX_DECODED_SIZE: usize = 1 << 20;

const SECTION_COUNT: usize = 5;

fn encode_number(n: f64) -> String {
    URL_SAFE_NO_PAD.encode(n.to_be_bytes())
}

fn decode_number(s: &str) -> Result<f64> {
    let bytes = URL_SAFE_NO_PAD
        .decode(s)
        .map_err(|e| Error::DecodeError(format!("number {:?}: {}", s, e)))?;
    let bytes: [u8; 8] = bytes
        .try_into()
        .map_err(|_| Error::DecodeError(format!("number {:?} is not 8 bytes", s)))?;
    let n = f64::from_be_bytes(bytes);
    if !n.is_finite() {
        return Err(Error::DecodeError(format!("number {:?} is not finite", s)));
    }
    Ok(n)
}

fn encode_bool(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

fn decode_bool(s: &str) -> Result<bool> {
    match s {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(Error::DecodeError(format!("flag {:?}", other))),
    }
}

fn encode_string(s: &str) -> String {
    let raw = URL_SAFE_NO_PAD.encode(s.as_bytes());
    let compressed = match zstd::bulk::compress(s.as_bytes(), COMPRESSION_LEVEL) {
        Ok(bytes) => URL_SAFE_NO_PAD.encode(bytes),
        Err(e) => {
            debug!("string compression failed, storing raw: {}", e);
            return format!("{}{}", TAG_RAW, raw);
        }
    };

    if compressed.len() < raw.len() {
        format!("{}{}", TAG_ZSTD, compressed)
    } else {
        format!("{}{}", TAG_RAW, raw)
    }
}

fn decode_string(s: &str) -> Result<String> {
    let mut chars = s.chars();
    let tag = chars
        .next()
        .ok_or_else(|| Error::DecodeError("empty string field".to_string()))?;
    let body = URL_SAFE_NO_PAD
        .decode(chars.as_str())
        .map_err(|e| Error::DecodeError(format!("string body: {}", e)))?;

    let bytes = match tag {
        TAG_RAW => body,
        TAG_ZSTD => decompress(&body)?,
        other => return Err(Error::DecodeError(format!("unknown string tag {:?}", other))),
    };

    String::from_utf8(bytes).map_err(|e| Error::DecodeError(format!("string utf-8: {}", e)))
}

fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    zstd::bulk::decompress(bytes, MAX_DECODED_SIZE)
        .map_err(|e| Error::CompressionError(e.to_string()))
}

/// Logs the failed field and substitutes its default.
fn or_default<T>(field: &str, result: Result<T>, default: T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            debug!("field {} unreadable, using default: {}", field, e);
            default
        }
    }
}

fn field<'a>(parts: &[&'a str], index: usize) -> Result<&'a str> {
    parts
        .get(index)
        .copied()
        .ok_or_else(|| Error::DecodeError(format!("missing field {}", index)))
}

fn number_field(parts: &[&str], index: usize, name: &str) -> f64 {
    or_default(name, field(parts, index).and_then(decode_number), 0.0)
}

fn bool_field(parts: &[&str], index: usize, name: &str) -> bool {
    or_default(name, field(parts, index).and_then(decode_bool), false)
}

fn string_field(parts: &[&str], index: usize, name: &str) -> String {
    or_default(name, field(parts, index).and_then(decode_string), String::new())
}

/// Decodes an integral number no smaller than `min`.
fn integer_field(parts: &[&str], index: usize, name: &str, min: u32) -> u32 {
    let result = field(parts, index).and_then(decode_number).and_then(|n| {
        if n.fract() != 0.0 || n < min as f64 || n > u32::MAX as f64 {
            Err(Error::DecodeError(format!("{} out of range", n)))
        } else {
            Ok(n as u32)
        }
    });
    or_default(name, result, min)
}

pub fn encode_budget_params(params: &BudgetParameters) -> String {
    let accommodation = &params.accommodation;
    let mut categories = vec![[
        encode_number(accommodation.amount),
        encode_number(accommodation.deposit),
        encode_bool(accommodation.is_shared).to_string(),
        encode_number(accommodation.number_of_people as f64),
    ]
    .join(FIELD_SEP)];

    for category in ExpenseCategory::ALL.iter().skip(1) {
        let expense = params.expense(*category);
        categories.push(format!(
            "{}{}{}",
            encode_number(expense.amount),
            FIELD_SEP,
            encode_bool(expense.is_shared)
        ));
    }

    categories.join(CATEGORY_SEP)
}

pub fn decode_budget_params(encoded: &str) -> BudgetParameters {
    let categories: Vec<&str> = encoded.split(CATEGORY_SEP).collect();
    let mut params = BudgetParameters::default();

    if let Some(section) = categories.first() {
        let parts: Vec<&str> = section.split(FIELD_SEP).collect();
        params.accommodation = AccommodationParameter {
            amount: number_field(&parts, 0, "accommodation.amount"),
            deposit: number_field(&parts, 1, "accommodation.deposit"),
            is_shared: bool_field(&parts, 2, "accommodation.isShared"),
            number_of_people: integer_field(&parts, 3, "accommodation.numberOfPeople", 1),
        };
    }

    for (index, category) in ExpenseCategory::ALL.iter().enumerate().skip(1) {
        let Some(section) = categories.get(index) else {
            debug!("category {} missing, using default", category);
            continue;
        };
        let parts: Vec<&str> = section.split(FIELD_SEP).collect();
        if let Some(slot) = params.expense_mut(*category) {
            *slot = ExpenseParameter {
                amount: number_field(&parts, 0, category.name()),
                is_shared: bool_field(&parts, 1, category.name()),
            };
        }
    }

    params
}

pub fn encode_flights(flights: &[Flight]) -> String {
    flights
        .iter()
        .map(|f| {
            [
                encode_string(&f.id),
                encode_number(f.price),
                encode_string(&f.description),
                encode_string(&f.date),
                encode_bool(f.is_shared).to_string(),
            ]
            .join(FLIGHT_FIELD_SEP)
        })
        .collect::<Vec<_>>()
        .join(FLIGHT_SEP)
}

pub fn decode_flights(encoded: &str) -> Vec<Flight> {
    if encoded.is_empty() {
        return Vec::new();
    }

    encoded
        .split(FLIGHT_SEP)
        .map(|flight| {
            let parts: Vec<&str> = flight.split(FLIGHT_FIELD_SEP).collect();
            Flight {
                id: string_field(&parts, 0, "flight.id"),
                price: number_field(&parts, 1, "flight.price"),
                description: string_field(&parts, 2, "flight.description"),
                date: string_field(&parts, 3, "flight.date"),
                is_shared: bool_field(&parts, 4, "flight.isShared"),
            }
        })
        .collect()
}

pub fn encode_scholarship(scholarship: &ScholarshipConfig) -> String {
    let mut parts = vec![
        encode_number(scholarship.monthly_grant),
        encode_number(scholarship.max_months as f64),
        encode_number(scholarship.travel_support),
    ];
    if let Some(additional) = scholarship.additional_support {
        parts.push(encode_number(additional));
    }
    parts.join(SCHOLARSHIP_SEP)
}

pub fn decode_scholarship(encoded: &str) -> ScholarshipConfig {
    let parts: Vec<&str> = encoded.split(SCHOLARSHIP_SEP).collect();
    ScholarshipConfig {
        monthly_grant: number_field(&parts, 0, "scholarship.monthlyGrant"),
        max_months: integer_field(&parts, 1, "scholarship.maxMonths", 0),
        travel_support: number_field(&parts, 2, "scholarship.travelSupport"),
        additional_support: match parts.get(3) {
            Some(s) if !s.is_empty() => Some(or_default(
                "scholarship.additionalSupport",
                decode_number(s),
                0.0,
            )),
            _ => None,
        },
    }
}

/// Builds the uncompressed composite string.
fn compose(state: &SharedState) -> String {
    [
        encode_string(&state.city_id),
        encode_number(state.stay_duration),
        encode_budget_params(&state.budget_params),
        encode_flights(&state.flights),
        encode_scholarship(&state.scholarship),
    ]
    .join(SECTION_SEP)
}

fn check_size(what: &str, len: usize) -> Result<()> {
    if len > MAX_DECODED_SIZE {
        return Err(Error::InvalidArgument(format!(
            "{} is {} bytes, limit is {}",
            what, len, MAX_DECODED_SIZE
        )));
    }
    Ok(())
}

/// Rejects strings that would not decompress under [`MAX_DECODED_SIZE`].
fn check_string_sizes(state: &SharedState) -> Result<()> {
    check_size("cityId", state.city_id.len())?;
    for flight in &state.flights {
        check_size("flight.id", flight.id.len())?;
        check_size("flight.description", flight.description.len())?;
        check_size("flight.date", flight.date.len())?;
    }
    Ok(())
}

/// Encodes a state into a URL-safe string.
///
/// Identical input always produces identical output, so the encoded form
/// can be used as a content key. Fails when a string or the composite is
/// larger than [`MAX_DECODED_SIZE`], since the link could not be decoded,
/// or when the compressor fails.
pub fn encode_state(state: &SharedState) -> Result<String> {
    check_string_sizes(state)?;
    let composite = compose(state);
    check_size("encoded state", composite.len())?;
    let compressed = zstd::bulk::compress(composite.as_bytes(), COMPRESSION_LEVEL)
        .map_err(|e| Error::CompressionError(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Decodes an encoded state, or `None` if the envelope is unreadable.
pub fn decode_state(encoded: &str) -> Option<SharedState> {
    match open_envelope(encoded.trim()) {
        Ok(composite) => Some(decompose(&composite)),
        Err(e) => {
            debug!("rejecting encoded state: {}", e);
            None
        }
    }
}

fn open_envelope(encoded: &str) -> Result<String> {
    if encoded.is_empty() {
        return Err(Error::DecodeError("empty payload".to_string()));
    }
    let compressed = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|e| Error::DecodeError(format!("envelope: {}", e)))?;
    let composite = String::from_utf8(decompress(&compressed)?)
        .map_err(|e| Error::DecodeError(format!("envelope utf-8: {}", e)))?;

    let sections = composite.split(SECTION_SEP).count();
    if sections != SECTION_COUNT {
        return Err(Error::Corruption(format!(
            "expected {} sections, found {}",
            SECTION_COUNT, sections
        )));
    }
    Ok(composite)
}

fn decompose(composite: &str) -> SharedState {
    let sections: Vec<&str> = composite.split(SECTION_SEP).collect();
    SharedState {
        city_id: string_field(&sections, 0, "cityId"),
        stay_duration: number_field(&sections, 1, "stayDuration"),
        budget_params: decode_budget_params(sections[2]),
        flights: decode_flights(sections[3]),
        scholarship: decode_scholarship(sections[4]),
    }
}
