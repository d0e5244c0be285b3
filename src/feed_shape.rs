use std::slice;

use serde_json::Value;

/// Type markers the provider puts in front of numeric ids
/// (team, player, game, match, competition, season).
const ID_PREFIXES: &[char] = &['t', 'p', 'g', 'm', 'c', 's'];

/// Canonical form of a provider identifier: `"t120"` and `"120"` both become `"120"`.
/// Anything that is not exactly `<prefix><digits>` is only trimmed.
pub fn normalize_id(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let body = chars.as_str();
    if ID_PREFIXES.contains(&first.to_ascii_lowercase()) && is_id_body(body) {
        return body.to_string();
    }
    trimmed.to_string()
}

fn is_id_body(body: &str) -> bool {
    !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit())
}

/// View a singular-or-plural feed field as a list.
/// Absent and `null` give an empty slice, arrays are returned as-is,
/// anything else is a one-element slice.
pub fn as_list(value: Option<&Value>) -> &[Value] {
    match value {
        None | Some(Value::Null) => &[],
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => slice::from_ref(other),
    }
}

/// First present child among `keys`, viewed as a list.
pub fn list_at<'a>(value: &'a Value, keys: &[&str]) -> &'a [Value] {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if !v.is_null() {
                return as_list(Some(v));
            }
        }
    }
    &[]
}

pub fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(s) = as_string(v) {
                if !s.is_empty() {
                    return Some(s);
                }
            }
        }
    }
    None
}

pub fn pick_u32(value: &Value, keys: &[&str]) -> Option<u32> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = v.as_u64() {
                return u32::try_from(num).ok();
            }
            if let Some(num) = v.as_f64() {
                return whole_u32(num);
            }
            if let Some(s) = v.as_str() {
                let s = s.trim();
                if let Ok(num) = s.parse::<u32>() {
                    return Some(num);
                }
                if let Some(num) = s.parse::<f64>().ok().and_then(whole_u32) {
                    return Some(num);
                }
            }
        }
    }
    None
}

/// `2.0` counts as 2; fractions, negatives and out-of-range values do not.
fn whole_u32(num: f64) -> Option<u32> {
    (num.is_finite() && num >= 0.0 && num.fract() == 0.0 && num <= f64::from(u32::MAX))
        .then_some(num as u32)
}

pub fn pick_f64(value: &Value, keys: &[&str]) -> Option<f64> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = v.as_f64() {
                return Some(num);
            }
            if let Some(s) = v.as_str() {
                if let Ok(num) = s.trim().parse::<f64>() {
                    return Some(num);
                }
            }
        }
    }
    None
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        // Some feeds wrap refs as `{ "id": "t12" }` or `{ "value": ... }`.
        Value::Object(map) => ["id", "value", "name"].iter().find_map(|k| match map.get(*k) {
            Some(Value::String(s)) => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_known_prefixes() {
        assert_eq!(normalize_id("t120"), "120");
        assert_eq!(normalize_id("P4471"), "4471");
        assert_eq!(normalize_id("g998877"), "998877");
        assert_eq!(normalize_id(" 55 "), "55");
    }

    #[test]
    fn leaves_other_ids_alone() {
        assert_eq!(normalize_id("team-x"), "team-x");
        assert_eq!(normalize_id("x123"), "x123");
        assert_eq!(normalize_id("t"), "t");
        assert_eq!(normalize_id("tp12"), "tp12");
        assert_eq!(normalize_id(""), "");
    }

    #[test]
    fn normalize_id_is_idempotent() {
        for raw in ["t120", "p1", "120", "s2024", "abc", " t7 ", "pp1", "t0012"] {
            let once = normalize_id(raw);
            assert_eq!(normalize_id(&once), once, "raw={raw}");
        }
    }

    #[test]
    fn as_list_shapes() {
        assert!(as_list(None).is_empty());
        assert!(as_list(Some(&Value::Null)).is_empty());

        let single = json!({ "playerRef": "p1" });
        assert_eq!(as_list(Some(&single)).len(), 1);

        let many = json!([{ "playerRef": "p1" }, { "playerRef": "p2" }]);
        let listed = as_list(Some(&many));
        let Value::Array(items) = &many else {
            unreachable!()
        };
        assert!(std::ptr::eq(listed, items.as_slice()));
    }

    #[test]
    fn pickers_accept_numbers_as_strings() {
        let v = json!({ "score": "3", "value": "1.5", "shirtNumber": 9 });
        assert_eq!(pick_u32(&v, &["score"]), Some(3));
        assert_eq!(pick_f64(&v, &["value"]), Some(1.5));
        assert_eq!(pick_u32(&v, &["missing", "shirtNumber"]), Some(9));
        assert_eq!(pick_string(&v, &["shirtNumber"]).as_deref(), Some("9"));
    }

    #[test]
    fn whole_floats_count_as_integers() {
        let v = json!({ "a": 2.0, "b": "1.0", "c": 0.0, "d": 2.5, "e": -1.0, "f": "-3", "g": 1e12 });
        assert_eq!(pick_u32(&v, &["a"]), Some(2));
        assert_eq!(pick_u32(&v, &["b"]), Some(1));
        assert_eq!(pick_u32(&v, &["c"]), Some(0));
        assert_eq!(pick_u32(&v, &["d"]), None);
        assert_eq!(pick_u32(&v, &["e"]), None);
        assert_eq!(pick_u32(&v, &["f"]), None);
        assert_eq!(pick_u32(&v, &["g"]), None);
    }
}
