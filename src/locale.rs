/// Fixed page text for one language.
#[derive(Debug, PartialEq, Eq)]
pub struct Strings {
    /// `{day}` and `{length}` are substituted.
    pub counter: &'static str,
    pub title_counter: &'static str,
    pub originally_published: &'static str,
    pub translated_from: &'static str,
}

const EN: Strings = Strings {
    counter: "day {day} of {length}",
    title_counter: "Day {day} of {length}",
    originally_published: "Originally published at",
    translated_from: "This is a translation of",
};

const ES: Strings = Strings {
    counter: "día {day} de {length}",
    title_counter: "Día {day} de {length}",
    originally_published: "Publicado originalmente en",
    translated_from: "Esta es una traducción de",
};

/// Looks up by primary subtag (`es-MX` uses `es`), falling back to English.
pub fn strings(lang: &str) -> &'static Strings {
    let primary = lang.split(['-', '_']).next().unwrap_or(lang);

    match primary.to_ascii_lowercase().as_str() {
        "es" => &ES,
        _ => &EN,
    }
}

pub fn fill(template: &str, day: u32, length: u32) -> String {
    template
        .replace("{day}", &day.to_string())
        .replace("{length}", &length.to_string())
}
