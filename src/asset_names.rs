use std::collections::HashSet;

use strsim::levenshtein;

use crate::model::AssetCandidate;

const EXACT_PART: u32 = 50;
const CONTAINED_PART: u32 = 35;
const NEAR_PART: u32 = 25;
const NEAR_DISTANCE: usize = 2;
const SHARED_WORD: u32 = 10;
const SHARED_WORD_MIN_LEN: usize = 3;
pub const MAX_SCORE: u32 = 100;

const PHOTO_PREFIX: &str = "photo_";

impl AssetCandidate {
    /// Candidate from a catalog path such as `Harbour City/HCY_Gonzalez_Maria.png`.
    /// Names that follow no known convention come back empty.
    pub fn from_path(path: &str) -> Self {
        let components: Vec<&str> = path
            .split(['/', '\\'])
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        let team_label = if components.len() >= 2 {
            components[0].to_string()
        } else {
            String::new()
        };
        let (first_name, last_name) = extract_name(&components).unwrap_or_default();
        Self {
            path: path.to_string(),
            first_name,
            last_name,
            team_label,
        }
    }
}

/// Filename first, then the parent folder; team-prefixed before `Photo_` in each.
fn extract_name(components: &[&str]) -> Option<(String, String)> {
    let (file, parents) = components.split_last()?;
    let stem = file_stem(file);
    if let Some(name) = parse_team_prefixed(stem).or_else(|| parse_photo_prefixed(stem)) {
        return Some(name);
    }
    // The first component is the team folder, never a person.
    let parent = parents.last().filter(|_| parents.len() >= 2)?;
    parse_team_prefixed(parent).or_else(|| parse_photo_prefixed(parent))
}

fn file_stem(file: &str) -> &str {
    match file.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && (1..=5).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            stem
        }
        _ => file,
    }
}

/// `<TEAM>_<Last>_<First...>`
fn parse_team_prefixed(stem: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = stem.split('_').map(str::trim).collect();
    if parts.len() < 3 || parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    let code = parts[0];
    if code.eq_ignore_ascii_case("photo") || !code.chars().all(char::is_alphanumeric) {
        return None;
    }
    let last = parts[1].to_string();
    let first = parts[2..].join(" ");
    Some((first, last))
}

/// `Photo_<First> <Last...>`
fn parse_photo_prefixed(stem: &str) -> Option<(String, String)> {
    let head = stem.get(..PHOTO_PREFIX.len())?;
    if !head.eq_ignore_ascii_case(PHOTO_PREFIX) {
        return None;
    }
    let rest = &stem[PHOTO_PREFIX.len()..];
    let mut tokens = rest.split_whitespace();
    let first = tokens.next()?.to_string();
    let last = tokens.collect::<Vec<_>>().join(" ");
    if last.is_empty() {
        return None;
    }
    Some((first, last))
}

/// Case-folded, diacritic-free, alphanumeric-only form of a name part.
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else if let Some(folded) = fold_diacritic(ch) {
            out.push_str(folded);
        } else if ch.is_alphanumeric() {
            // Cyrillic, Greek, CJK and other scripts are kept as written.
            out.push(ch);
        }
    }
    out
}

/// Whole words of a full name, each normalized.
pub fn name_words(first: &str, last: &str) -> Vec<String> {
    first
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_' || c == '.')
        .chain(last.split(|c: char| c.is_whitespace() || c == '-' || c == '_' || c == '.'))
        .map(normalize_name)
        .filter(|w| !w.is_empty())
        .collect()
}

/// Similarity of a roster name and a candidate name, 0..=100.
pub fn score_names(
    roster_first: &str,
    roster_last: &str,
    cand_first: &str,
    cand_last: &str,
) -> u32 {
    let roster_words = name_words(roster_first, roster_last);
    let cand_words = name_words(cand_first, cand_last);
    if !roster_words.is_empty() && roster_words == cand_words {
        return MAX_SCORE;
    }

    let rf = normalize_name(roster_first);
    let rl = normalize_name(roster_last);
    let cf = normalize_name(cand_first);
    let cl = normalize_name(cand_last);
    let straight = part_score(&rf, &cf) + part_score(&rl, &cl);
    let swapped = part_score(&rf, &cl) + part_score(&rl, &cf);

    let roster_set: HashSet<&str> = roster_words
        .iter()
        .map(String::as_str)
        .filter(|w| w.chars().count() >= SHARED_WORD_MIN_LEN)
        .collect();
    let shared = cand_words
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .intersection(&roster_set)
        .count() as u32;

    (straight.max(swapped) + shared * SHARED_WORD).min(MAX_SCORE)
}

fn part_score(a: &str, b: &str) -> u32 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    if a == b {
        EXACT_PART
    } else if a.contains(b) || b.contains(a) {
        CONTAINED_PART
    } else if levenshtein(a, b) <= NEAR_DISTANCE {
        NEAR_PART
    } else {
        0
    }
}

fn fold_diacritic(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ð' | 'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĳ' => "ij",
        'ĵ' => "j",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' | 'ș' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' | 'ț' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_prefixed_filename() {
        let c = AssetCandidate::from_path("Harbour City/HCY_Gonzalez_Maria.png");
        assert_eq!(c.team_label, "Harbour City");
        assert_eq!(c.first_name, "Maria");
        assert_eq!(c.last_name, "Gonzalez");
    }

    #[test]
    fn team_code_length_is_not_limited() {
        let c = AssetCandidate::from_path("Northgate FC/NORTHGATE_Diaz_Carla.png");
        assert_eq!((c.first_name.as_str(), c.last_name.as_str()), ("Carla", "Diaz"));
        let c = AssetCandidate::from_path("Northgate FC/N_Diaz_Carla.png");
        assert_eq!((c.first_name.as_str(), c.last_name.as_str()), ("Carla", "Diaz"));
    }

    #[test]
    fn photo_prefixed_filename() {
        let c = AssetCandidate::from_path("Harbour City/Photo_Maria Gonzalez.jpg");
        assert_eq!((c.first_name.as_str(), c.last_name.as_str()), ("Maria", "Gonzalez"));
    }

    #[test]
    fn parent_folder_is_tried_after_filename() {
        let c = AssetCandidate::from_path("Harbour City/HCY_Okafor_Ada/IMG_0042.JPG");
        assert_eq!((c.first_name.as_str(), c.last_name.as_str()), ("Ada", "Okafor"));
        let c = AssetCandidate::from_path("Harbour City\\Photo_Ada Okafor\\final.png");
        assert_eq!((c.first_name.as_str(), c.last_name.as_str()), ("Ada", "Okafor"));
    }

    #[test]
    fn unparseable_names_are_empty() {
        let c = AssetCandidate::from_path("Harbour City/team-lineup.png");
        assert!(c.first_name.is_empty() && c.last_name.is_empty());
        let c = AssetCandidate::from_path("loose.png");
        assert!(c.team_label.is_empty());
        assert!(c.first_name.is_empty());
    }

    #[test]
    fn normalization_folds_case_and_accents() {
        assert_eq!(normalize_name("Núñez-Ó'Brien"), "nunezobrien");
        assert_eq!(normalize_name("ŠTĚPÁNKA"), "stepanka");
        assert_eq!(normalize_name("Strauß"), "strauss");
    }

    #[test]
    fn exact_full_name_is_100() {
        assert_eq!(score_names("María", "González", "Maria", "Gonzalez"), 100);
    }

    #[test]
    fn non_latin_names_are_kept() {
        assert_eq!(normalize_name("ПЕТРОВ"), "петров");
        assert_eq!(score_names("Иван", "Петров", "Иван", "Петров"), 100);
        assert_eq!(score_names("Γιώργος", "Παπαδόπουλος", "Γιώργος", "Παπαδόπουλος"), 100);
        assert_eq!(score_names("王", "伟", "王", "伟"), 100);
        // one letter off in the last name
        assert_eq!(score_names("Иван", "Петров", "Иван", "Петрова"), 50 + 35 + 10);
    }

    #[test]
    fn non_latin_team_prefixed_filename() {
        let c = AssetCandidate::from_path("Спартак/СПАРТАК_Петров_Иван.png");
        assert_eq!((c.first_name.as_str(), c.last_name.as_str()), ("Иван", "Петров"));
        assert_eq!(score_names("Иван", "Петров", &c.first_name, &c.last_name), 100);
    }

    #[test]
    fn swapped_order_scores_like_straight_order() {
        let straight = score_names("Ada", "Okafor", "Ada", "Okafr");
        let swapped = score_names("Ada", "Okafor", "Okafr", "Ada");
        assert_eq!(straight, swapped);
        assert_eq!(straight, 50 + 25);
    }

    #[test]
    fn near_names_score_below_exact() {
        let s = score_names("Maria", "Gonzalez", "M", "Gonzales");
        assert_eq!(s, 35 + 25);
    }

    #[test]
    fn shared_words_add_bonus() {
        // last names equal, first names unrelated: 50 + one shared word
        assert_eq!(score_names("Maria", "Gonzalez", "Lucia", "Gonzalez"), 60);
        // short words do not count
        assert_eq!(score_names("Li", "Na", "Li", "Xu"), 50);
    }

    #[test]
    fn empty_parts_score_zero() {
        assert_eq!(score_names("Maria", "Gonzalez", "", ""), 0);
        assert_eq!(score_names("", "", "", ""), 0);
    }
}
