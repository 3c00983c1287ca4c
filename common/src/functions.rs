//! Capability descriptor decoding: speed level count and set-point range.

use serde_json::Value;

use crate::{
    codes::{CODE_LEVEL, CODE_TEMP_SET_C, CODE_TEMP_SET_F, FUNCTION_TEMP_SET_C},
    config::{HeaterConfig, TempRange},
    error::HeaterError,
    types::{FunctionDescriptor, TemperatureUnit},
};

/// Number of discrete speed levels the device declares for `level`.
///
/// Falls back to `config.default_level_count` when there are no descriptors,
/// no `level` descriptor, or the descriptor carries the empty `{}` range spec.
pub fn resolve_level_count(
    functions: &[FunctionDescriptor],
    config: &HeaterConfig,
) -> Result<u32, HeaterError> {
    let default = config.default_level_count.max(1);
    let Some(descriptor) = functions.iter().find(|item| item.code == CODE_LEVEL) else {
        return Ok(default);
    };

    let Some(spec) = decode_range_spec(descriptor)? else {
        return Ok(default);
    };

    let range = spec
        .get("range")
        .and_then(Value::as_array)
        .ok_or_else(|| HeaterError::MissingRangeKey {
            code: descriptor.code.clone(),
            key: "range",
        })?;

    if range.is_empty() {
        return Ok(default);
    }
    Ok(u32::try_from(range.len()).unwrap_or(u32::MAX))
}

/// Set-point range declared by whichever temperature capability is present.
///
/// Every descriptor is decoded while scanning, so a malformed spec anywhere in
/// the list fails construction. When both set-point capabilities appear the
/// last one wins.
pub fn resolve_temp_range(
    functions: &[FunctionDescriptor],
    config: &HeaterConfig,
) -> Result<Option<TempRange>, HeaterError> {
    let mut resolved = None;

    for descriptor in functions {
        let spec = decode_range_spec(descriptor)?;
        let Some(unit) = set_point_unit(&descriptor.code) else {
            continue;
        };

        resolved = Some(match spec {
            None => config.set_range_fallback(unit),
            Some(spec) => TempRange::new(
                bound(descriptor, &spec, "min")?,
                bound(descriptor, &spec, "max")?,
            ),
        });
    }

    Ok(resolved)
}

pub fn set_point_unit(code: &str) -> Option<TemperatureUnit> {
    match code {
        FUNCTION_TEMP_SET_C | CODE_TEMP_SET_C => Some(TemperatureUnit::Celsius),
        CODE_TEMP_SET_F => Some(TemperatureUnit::Fahrenheit),
        _ => None,
    }
}

/// `None` is the empty-object sentinel.
fn decode_range_spec(descriptor: &FunctionDescriptor) -> Result<Option<Value>, HeaterError> {
    let value: Value = serde_json::from_str(&descriptor.values).map_err(|source| {
        HeaterError::MalformedDescriptor {
            code: descriptor.code.clone(),
            source,
        }
    })?;

    match value {
        Value::Object(ref map) if map.is_empty() => Ok(None),
        other => Ok(Some(other)),
    }
}

fn bound(
    descriptor: &FunctionDescriptor,
    spec: &Value,
    key: &'static str,
) -> Result<i64, HeaterError> {
    let parsed = match spec.get(key) {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|value| value.trunc() as i64)),
        Some(Value::String(text)) => parse_leading_int(text),
        _ => None,
    };

    parsed.ok_or_else(|| HeaterError::MissingRangeKey {
        code: descriptor.code.clone(),
        key,
    })
}

/// Integer prefix of a numeric string, so `"30"` and `"30.5"` both read as 30.
fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim();
    let end = text
        .char_indices()
        .find(|&(index, ch)| !(ch.is_ascii_digit() || (index == 0 && (ch == '-' || ch == '+'))))
        .map_or(text.len(), |(index, _)| index);
    text[..end].parse().ok()
}
