//! ID3v1 genre references in `TCON`

/// ID3v1 genre names by index
const ID3V1_GENRES: [&str; 80] = [
    "Blues",
    "Classic Rock",
    "Country",
    "Dance",
    "Disco",
    "Funk",
    "Grunge",
    "Hip-Hop",
    "Jazz",
    "Metal",
    "New Age",
    "Oldies",
    "Other",
    "Pop",
    "R&B",
    "Rap",
    "Reggae",
    "Rock",
    "Techno",
    "Industrial",
    "Alternative",
    "Ska",
    "Death Metal",
    "Pranks",
    "Soundtrack",
    "Euro-Techno",
    "Ambient",
    "Trip-Hop",
    "Vocal",
    "Jazz+Funk",
    "Fusion",
    "Trance",
    "Classical",
    "Instrumental",
    "Acid",
    "House",
    "Game",
    "Sound Clip",
    "Gospel",
    "Noise",
    "AlternRock",
    "Bass",
    "Soul",
    "Punk",
    "Space",
    "Meditative",
    "Instrumental Pop",
    "Instrumental Rock",
    "Ethnic",
    "Gothic",
    "Darkwave",
    "Techno-Industrial",
    "Electronic",
    "Pop-Folk",
    "Eurodance",
    "Dream",
    "Southern Rock",
    "Comedy",
    "Cult",
    "Gangsta",
    "Top 40",
    "Christian Rap",
    "Pop/Funk",
    "Jungle",
    "Native American",
    "Cabaret",
    "New Wave",
    "Psychadelic",
    "Rave",
    "Showtunes",
    "Trailer",
    "Lo-Fi",
    "Tribal",
    "Acid Punk",
    "Acid Jazz",
    "Polka",
    "Retro",
    "Musical",
    "Rock & Roll",
    "Hard Rock",
];

fn reference(token: &str) -> Option<String> {
    match token {
        "RX" => Some("Remix".to_string()),
        "CR" => Some("Cover".to_string()),
        _ => {
            let index: usize = token.parse().ok()?;
            ID3V1_GENRES.get(index).map(|g| (*g).to_string())
        }
    }
}

/// Resolve `"(17)"`, `"17"`, `"(17)Rock"` or `"(RX)"` style values
///
/// A refinement text after the references wins over the referenced names.
/// Unresolvable references are dropped; plain text passes through.
pub(crate) fn resolve(value: &str) -> Vec<String> {
    let value = value.trim();
    if let Some(genre) = reference(value) {
        return vec![genre];
    }

    let mut refs = Vec::new();
    let mut rest = value;
    while let Some(inner) = rest.strip_prefix('(') {
        if inner.starts_with('(') {
            // "((" escapes a literal parenthesis
            rest = inner;
            break;
        }
        let Some(close) = inner.find(')') else { break };
        if let Some(genre) = reference(&inner[..close]) {
            refs.push(genre);
        }
        rest = &inner[close + 1..];
    }

    let refinement = rest.trim();
    if refinement.is_empty() {
        refs
    } else {
        vec![refinement.to_string()]
    }
}
