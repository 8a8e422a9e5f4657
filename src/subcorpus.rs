use serde::{Deserialize, Serialize};

/// How one search result document is laid out in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocLayout {
    /// Every `li` is one example.
    Plain,
    /// `li` elements come in original/translation pairs.
    Parallel,
}

/// The corpora behind the search endpoint, selected by the `mode` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subcorpus {
    #[default]
    Main,
    Paper2000,
    PaperRegional,
    Parallel,
    MultilingualPara,
    Tutoring,
    Dialect,
    Spoken,
    Accentology,
    Poetic,
    Syntax,
    Multimodal,
    Historical,
}

impl Subcorpus {
    pub const ALL: [Subcorpus; 13] = [
        Subcorpus::Main,
        Subcorpus::Paper2000,
        Subcorpus::PaperRegional,
        Subcorpus::Parallel,
        Subcorpus::MultilingualPara,
        Subcorpus::Tutoring,
        Subcorpus::Dialect,
        Subcorpus::Spoken,
        Subcorpus::Accentology,
        Subcorpus::Poetic,
        Subcorpus::Syntax,
        Subcorpus::Multimodal,
        Subcorpus::Historical,
    ];

    /// Value of the `mode` request parameter.
    pub fn mode(&self) -> &'static str {
        match self {
            Subcorpus::Main => "main",
            Subcorpus::Paper2000 => "paper",
            Subcorpus::PaperRegional => "regional",
            Subcorpus::Parallel => "para",
            Subcorpus::MultilingualPara => "multi",
            Subcorpus::Tutoring => "school",
            Subcorpus::Dialect => "dialect",
            Subcorpus::Spoken => "spoken",
            Subcorpus::Accentology => "accent",
            Subcorpus::Poetic => "poetic",
            Subcorpus::Syntax => "syntax",
            Subcorpus::Multimodal => "murco",
            Subcorpus::Historical => "mid_rus",
        }
    }

    pub fn from_mode(mode: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.mode() == mode)
    }

    pub fn layout(&self) -> DocLayout {
        match self {
            Subcorpus::Parallel | Subcorpus::MultilingualPara => DocLayout::Parallel,
            _ => DocLayout::Plain,
        }
    }
}

/// `mycorp` tokens restricting the main corpus to one author.
pub mod person {
    pub const PUSHKIN: &str = "JSONeyJkb2NfYXV0aG9yIjogWyLQkC7QoS4g0J_Rg9GI0LrQuNC9Il19";
    pub const DOSTOYEVSKY: &str =
        "JSONeyJkb2NfYXV0aG9yIjogWyLQpC7QnC4g0JTQvtGB0YLQvtC10LLRgdC60LjQuSJdfQ==";
    pub const TOLSTOY_LN: &str = "JSONeyJkb2NfYXV0aG9yIjogWyLQmy7QnS4g0KLQvtC70YHRgtC-0LkiXX0=";
    pub const CHEKHOV: &str = "JSONeyJkb2NfYXV0aG9yIjogWyLQkC7Qny4g0KfQtdGF0L7QsiJdfQ==";
    pub const GOGOL: &str = "JSONeyJkb2NfYXV0aG9yIjogWyLQnS7Qki4g0JPQvtCz0L7Qu9GMIl19";
    pub const TURGENEV: &str = "JSONeyJkb2NfYXV0aG9yIjogWyLQmC7QoS4g0KLRg9GA0LPQtdC90LXQsiJdfQ==";

    /// Token by lower-case surname.
    pub fn by_name(name: &str) -> Option<&'static str> {
        let token = match name.trim().to_lowercase().as_str() {
            "pushkin" => PUSHKIN,
            "dostoyevsky" => DOSTOYEVSKY,
            "tolstoy" => TOLSTOY_LN,
            "chekhov" => CHEKHOV,
            "gogol" => GOGOL,
            "turgenev" => TURGENEV,
            _ => return None,
        };
        Some(token)
    }
}

/// `mycorp` tokens restricting a parallel corpus to one language paired with Russian.
pub mod parallel {
    pub const ENGLISH: &str =
        "JSONeyJkb2NfbGFuZyI6IFsiZW5nIl0sICJpc19wYXJhX2JvdGhfcGFpcnMiOiBbdHJ1ZV19";
    pub const ARMENIAN: &str =
        "JSONeyJkb2NfbGFuZyI6IFsiYXJtIl0sICJpc19wYXJhX2JvdGhfcGFpcnMiOiBbdHJ1ZV19";
    pub const BASHKIR: &str =
        "JSONeyJkb2NfbGFuZyI6IFsiYmFzaCJdLCAiaXNfcGFyYV9ib3RoX3BhaXJzIjogW3RydWVdfQ==";
    pub const BELARUSIAN: &str =
        "JSONeyJkb2NfbGFuZyI6IFsiYmVsIl0sICJpc19wYXJhX2JvdGhfcGFpcnMiOiBbdHJ1ZV19";
    pub const BULGARIAN: &str =
        "JSONeyJkb2NfbGFuZyI6IFsiYnVsIl0sICJpc19wYXJhX2JvdGhfcGFpcnMiOiBbdHJ1ZV19";
    pub const BURYATIAN: &str =
        "JSONeyJkb2NfbGFuZyI6IFsiYnVhIl0sICJpc19wYXJhX2JvdGhfcGFpcnMiOiBbdHJ1ZV19";
    pub const SPANISH: &str =
        "JSONeyJkb2NfbGFuZyI6IFsiZXNwIl0sICJpc19wYXJhX2JvdGhfcGFpcnMiOiBbdHJ1ZV19";
    pub const ITALIAN: &str =
        "JSONeyJkb2NfbGFuZyI6IFsiaXRhIl0sICJpc19wYXJhX2JvdGhfcGFpcnMiOiBbdHJ1ZV19";
    pub const LATVIAN: &str =
        "JSONeyJkb2NfbGFuZyI6IFsibGF2Il0sICJpc19wYXJhX2JvdGhfcGFpcnMiOiBbdHJ1ZV19";
    pub const LITHUANIAN: &str =
        "JSONeyJkb2NfbGFuZyI6IFsibGl0Il0sICJpc19wYXJhX2JvdGhfcGFpcnMiOiBbdHJ1ZV19";
    pub const GERMAN: &str =
        "JSONeyJkb2NfbGFuZyI6IFsiZ2VyIl0sICJpc19wYXJhX2JvdGhfcGFpcnMiOiBbdHJ1ZV19";
    pub const POLISH: &str =
        "JSONeyJkb2NfbGFuZyI6IFsicG9sIl0sICJpc19wYXJhX2JvdGhfcGFpcnMiOiBbdHJ1ZV19";
    pub const UKRAINIAN: &str =
        "JSONeyJkb2NfbGFuZyI6IFsidWtyIl0sICJpc19wYXJhX2JvdGhfcGFpcnMiOiBbdHJ1ZV19";
    pub const FRENCH: &str =
        "JSONeyJkb2NfbGFuZyI6IFsiZnJhIl0sICJpc19wYXJhX2JvdGhfcGFpcnMiOiBbdHJ1ZV19";
    pub const FINNISH: &str =
        "JSONeyJkb2NfbGFuZyI6IFsiZmluIl0sICJpc19wYXJhX2JvdGhfcGFpcnMiOiBbdHJ1ZV19";
    pub const CZECH: &str =
        "JSONeyJkb2NfbGFuZyI6IFsiY3plIl0sICJpc19wYXJhX2JvdGhfcGFpcnMiOiBbdHJ1ZV19";
    pub const SWEDISH: &str =
        "JSONeyJkb2NfbGFuZyI6IFsic3ZlIl0sICJpc19wYXJhX2JvdGhfcGFpcnMiOiBbdHJ1ZV19";
    pub const ESTONIAN: &str =
        "JSONeyJkb2NfbGFuZyI6IFsiZXN0Il0sICJpc19wYXJhX2JvdGhfcGFpcnMiOiBbdHJ1ZV19";

    /// Token by lower-case English language name.
    pub fn by_name(name: &str) -> Option<&'static str> {
        let token = match name.trim().to_lowercase().as_str() {
            "english" => ENGLISH,
            "armenian" => ARMENIAN,
            "bashkir" => BASHKIR,
            "belarusian" => BELARUSIAN,
            "bulgarian" => BULGARIAN,
            "buryatian" => BURYATIAN,
            "spanish" => SPANISH,
            "italian" => ITALIAN,
            "latvian" => LATVIAN,
            "lithuanian" => LITHUANIAN,
            "german" => GERMAN,
            "polish" => POLISH,
            "ukrainian" => UKRAINIAN,
            "french" => FRENCH,
            "finnish" => FINNISH,
            "czech" => CZECH,
            "swedish" => SWEDISH,
            "estonian" => ESTONIAN,
            _ => return None,
        };
        Some(token)
    }
}
