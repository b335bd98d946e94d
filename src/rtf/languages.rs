//! Windows locale identifiers used by `\lang`, `\langfe` and `\deflang`.

use phf::phf_map;

static LANGUAGES: phf::Map<u32, &'static str> = phf_map! {
    0x0000u32 => "no-language",
    0x0401u32 => "arabic",
    0x0402u32 => "bulgarian",
    0x0403u32 => "catalan",
    0x0404u32 => "traditional-chinese",
    0x0405u32 => "czech",
    0x0406u32 => "danish",
    0x0407u32 => "german",
    0x0408u32 => "greek",
    0x0409u32 => "english-us",
    0x040Au32 => "spanish-castilian",
    0x040Bu32 => "finnish",
    0x040Cu32 => "french",
    0x040Du32 => "hebrew",
    0x040Eu32 => "hungarian",
    0x040Fu32 => "icelandic",
    0x0410u32 => "italian",
    0x0411u32 => "japanese",
    0x0412u32 => "korean",
    0x0413u32 => "dutch",
    0x0414u32 => "norwegian-bokmal",
    0x0415u32 => "polish",
    0x0416u32 => "portuguese-brazil",
    0x0417u32 => "rhaeto-romanic",
    0x0418u32 => "romanian",
    0x0419u32 => "russian",
    0x041Au32 => "croatian",
    0x041Bu32 => "slovak",
    0x041Cu32 => "albanian",
    0x041Du32 => "swedish",
    0x041Eu32 => "thai",
    0x041Fu32 => "turkish",
    0x0420u32 => "urdu",
    0x0421u32 => "indonesian",
    0x0422u32 => "ukrainian",
    0x0423u32 => "byelorussian",
    0x0424u32 => "slovenian",
    0x0425u32 => "estonian",
    0x0426u32 => "latvian",
    0x0427u32 => "lithuanian",
    0x0429u32 => "farsi",
    0x042Au32 => "vietnamese",
    0x042Bu32 => "armenian",
    0x042Cu32 => "azeri-latin",
    0x042Du32 => "basque",
    0x042Eu32 => "sorbian",
    0x042Fu32 => "macedonian",
    0x0430u32 => "sutu",
    0x0431u32 => "tsonga",
    0x0432u32 => "tswana",
    0x0433u32 => "venda",
    0x0434u32 => "xhosa",
    0x0435u32 => "zulu",
    0x0436u32 => "afrikaans",
    0x0437u32 => "georgian",
    0x0438u32 => "faeroese",
    0x0439u32 => "hindi",
    0x043Au32 => "maltese",
    0x043Bu32 => "sami",
    0x043Cu32 => "gaelic",
    0x043Du32 => "yiddish",
    0x043Eu32 => "malay",
    0x043Fu32 => "kazakh",
    0x0440u32 => "kyrgyz",
    0x0441u32 => "swahili",
    0x0442u32 => "turkmen",
    0x0443u32 => "uzbek-latin",
    0x0444u32 => "tatar",
    0x0445u32 => "bengali",
    0x0446u32 => "punjabi",
    0x0447u32 => "gujarati",
    0x0448u32 => "oriya",
    0x0449u32 => "tamil",
    0x044Au32 => "telugu",
    0x044Bu32 => "kannada",
    0x044Cu32 => "malayalam",
    0x044Du32 => "assamese",
    0x044Eu32 => "marathi",
    0x044Fu32 => "sanskrit",
    0x0450u32 => "mongolian",
    0x0451u32 => "tibetan",
    0x0452u32 => "welsh",
    0x0453u32 => "khmer",
    0x0454u32 => "lao",
    0x0455u32 => "burmese",
    0x0456u32 => "galician",
    0x0457u32 => "konkani",
    0x0458u32 => "manipuri",
    0x0459u32 => "sindhi",
    0x045Au32 => "syriac",
    0x045Bu32 => "sinhalese",
    0x045Cu32 => "cherokee",
    0x045Du32 => "inuktitut",
    0x045Eu32 => "amharic",
    0x045Fu32 => "tamazight",
    0x0460u32 => "kashmiri",
    0x0461u32 => "nepali",
    0x0462u32 => "frisian",
    0x0463u32 => "pashto",
    0x0464u32 => "filipino",
    0x0465u32 => "divehi",
    0x0466u32 => "edo",
    0x0467u32 => "fulfulde",
    0x0468u32 => "hausa",
    0x0469u32 => "ibibio",
    0x046Au32 => "yoruba",
    0x046Bu32 => "quechua",
    0x046Cu32 => "sesotho",
    0x046Du32 => "bashkir",
    0x046Eu32 => "luxembourgish",
    0x046Fu32 => "greenlandic",
    0x0470u32 => "igbo",
    0x0471u32 => "kanuri",
    0x0472u32 => "oromo",
    0x0473u32 => "tigrigna",
    0x0474u32 => "guarani",
    0x0475u32 => "hawaiian",
    0x0476u32 => "latin",
    0x0477u32 => "somali",
    0x0478u32 => "yi",
    0x047Au32 => "mapudungun",
    0x047Cu32 => "mohawk",
    0x047Eu32 => "breton",
    0x0480u32 => "uighur",
    0x0481u32 => "maori",
    0x0482u32 => "occitan",
    0x0483u32 => "corsican",
    0x0484u32 => "alsatian",
    0x0485u32 => "yakut",
    0x0486u32 => "kiche",
    0x0487u32 => "kinyarwanda",
    0x0488u32 => "wolof",
    0x048Cu32 => "dari",
    0x0491u32 => "scottish-gaelic",
    0x0801u32 => "arabic-iraq",
    0x0804u32 => "simplified-chinese",
    0x0807u32 => "german-swiss",
    0x0809u32 => "english-uk",
    0x080Au32 => "spanish-mexico",
    0x080Cu32 => "french-belgian",
    0x0810u32 => "italian-swiss",
    0x0813u32 => "dutch-belgian",
    0x0814u32 => "norwegian-nynorsk",
    0x0816u32 => "portuguese",
    0x0818u32 => "romanian-moldova",
    0x0819u32 => "russian-moldova",
    0x081Au32 => "serbian-latin",
    0x081Du32 => "swedish-finland",
    0x0820u32 => "urdu-india",
    0x0827u32 => "lithuanian-classic",
    0x082Cu32 => "azeri-cyrillic",
    0x083Cu32 => "irish",
    0x083Eu32 => "malay-brunei",
    0x0843u32 => "uzbek-cyrillic",
    0x0845u32 => "bengali-bangladesh",
    0x0850u32 => "mongolian-mongolian",
    0x0C01u32 => "arabic-egypt",
    0x0C04u32 => "chinese-hong-kong",
    0x0C07u32 => "german-austrian",
    0x0C09u32 => "english-australian",
    0x0C0Au32 => "spanish-modern",
    0x0C0Cu32 => "french-canadian",
    0x0C1Au32 => "serbian-cyrillic",
    0x1004u32 => "chinese-singapore",
    0x1007u32 => "german-luxembourg",
    0x1009u32 => "english-canadian",
    0x100Au32 => "spanish-guatemala",
    0x100Cu32 => "french-swiss",
    0x1404u32 => "chinese-macau",
    0x1409u32 => "english-new-zealand",
    0x140Au32 => "spanish-costa-rica",
    0x140Cu32 => "french-luxembourg",
    0x1809u32 => "english-ireland",
    0x180Au32 => "spanish-panama",
    0x1C09u32 => "english-south-africa",
    0x1C0Au32 => "spanish-dominican-republic",
    0x2009u32 => "english-jamaica",
    0x200Au32 => "spanish-venezuela",
    0x2409u32 => "english-caribbean",
    0x240Au32 => "spanish-colombia",
    0x2809u32 => "english-belize",
    0x280Au32 => "spanish-peru",
    0x2C09u32 => "english-trinidad",
    0x2C0Au32 => "spanish-argentina",
    0x3009u32 => "english-zimbabwe",
    0x300Au32 => "spanish-ecuador",
    0x3409u32 => "english-philippines",
    0x340Au32 => "spanish-chile",
    0x3C0Au32 => "spanish-paraguay",
    0x400Au32 => "spanish-bolivia",
    0x4009u32 => "english-india",
    0x440Au32 => "spanish-el-salvador",
    0x4809u32 => "english-singapore",
    0x480Au32 => "spanish-honduras",
    0x4C0Au32 => "spanish-nicaragua",
    0x500Au32 => "spanish-puerto-rico",
    0x540Au32 => "spanish-united-states",
    0x0400u32 => "default",
    0x0800u32 => "system-default",
    0x0C00u32 => "custom-default",
    0x0C0Bu32 => "sami-finland",
};

/// Language name for a locale id; unknown ids keep their number.
pub fn language_name(value: i32) -> String {
    u32::try_from(value)
        .ok()
        .and_then(|v| LANGUAGES.get(&v))
        .map(|s| s.to_string())
        .unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_languages() {
        assert_eq!(language_name(1033), "english-us");
        assert_eq!(language_name(2057), "english-uk");
        assert_eq!(language_name(1049), "russian");
    }

    #[test]
    fn test_unknown_language_keeps_number() {
        assert_eq!(language_name(31337), "31337");
        assert_eq!(language_name(-1), "-1");
    }
}
