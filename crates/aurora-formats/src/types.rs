//! Canonical resource-type code table
//!
//! The same small-integer codes appear in the type fields of all four
//! container formats and map one-to-one onto loose-file extensions. The
//! numeric values are fixed by the original engine data and must not change.

use std::fmt;

macro_rules! resource_types {
    ($( $variant:ident = $code:literal, $ext:literal; )*) => {
        /// One logical kind of game resource.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum ResourceType {
            $( $variant = $code, )*
        }

        impl ResourceType {
            /// Map a wire type code onto a resource type.
            pub fn from_code(code: u16) -> Option<Self> {
                match code {
                    $( $code => Some(Self::$variant), )*
                    _ => None,
                }
            }

            /// The loose-file extension for this type, lower-case.
            pub fn extension(self) -> &'static str {
                match self {
                    $( Self::$variant => $ext, )*
                }
            }

            /// Map a lower-case file extension onto a resource type.
            pub fn from_extension(ext: &str) -> Option<Self> {
                match ext {
                    $( $ext => Some(Self::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

resource_types! {
    Res = 0, "res";
    Bmp = 1, "bmp";
    Tga = 3, "tga";
    Wav = 4, "wav";
    Plt = 6, "plt";
    Ini = 7, "ini";
    Txt = 10, "txt";
    Mdl = 2002, "mdl";
    Nss = 2009, "nss";
    Ncs = 2010, "ncs";
    Are = 2012, "are";
    Set = 2013, "set";
    Ifo = 2014, "ifo";
    Bic = 2015, "bic";
    Wok = 2016, "wok";
    TwoDa = 2017, "2da";
    Tlk = 2018, "tlk";
    Txi = 2022, "txi";
    Git = 2023, "git";
    Bti = 2024, "bti";
    Uti = 2025, "uti";
    Btc = 2026, "btc";
    Utc = 2027, "utc";
    Dlg = 2029, "dlg";
    Itp = 2030, "itp";
    Btt = 2031, "btt";
    Utt = 2032, "utt";
    Dds = 2033, "dds";
    Bts = 2034, "bts";
    Uts = 2035, "uts";
    Ltr = 2036, "ltr";
    Gff = 2037, "gff";
    Fac = 2038, "fac";
    Bte = 2039, "bte";
    Ute = 2040, "ute";
    Btd = 2041, "btd";
    Utd = 2042, "utd";
    Btp = 2043, "btp";
    Utp = 2044, "utp";
    Dft = 2045, "dft";
    Gic = 2046, "gic";
    Gui = 2047, "gui";
    Btm = 2050, "btm";
    Utm = 2051, "utm";
    Dwk = 2052, "dwk";
    Pwk = 2053, "pwk";
    Btg = 2054, "btg";
    Utg = 2055, "utg";
    Jrl = 2056, "jrl";
    Sav = 2057, "sav";
    Utw = 2058, "utw";
    FourPc = 2059, "4pc";
    Ssf = 2060, "ssf";
    Hak = 2061, "hak";
    Nwm = 2062, "nwm";
    Bik = 2063, "bik";
    Ndb = 2064, "ndb";
    Ptm = 2065, "ptm";
    Ptt = 2066, "ptt";
    Lyt = 3000, "lyt";
    Vis = 3001, "vis";
    Rim = 3002, "rim";
    Pth = 3003, "pth";
    Lip = 3004, "lip";
    Bwm = 3005, "bwm";
    Txb = 3006, "txb";
    Tpc = 3007, "tpc";
    Mdx = 3008, "mdx";
}

impl ResourceType {
    /// The wire type code shared by all container formats.
    pub fn code(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_round_trip() {
        for code in [0u16, 4, 2017, 2027, 2047, 3002, 3008] {
            let ty = ResourceType::from_code(code).unwrap();
            assert_eq!(ty.code(), code);
        }
    }

    #[test]
    fn extension_round_trip() {
        assert_eq!(ResourceType::from_extension("2da"), Some(ResourceType::TwoDa));
        assert_eq!(ResourceType::from_extension("utc"), Some(ResourceType::Utc));
        assert_eq!(ResourceType::TwoDa.extension(), "2da");
        assert_eq!(ResourceType::from_extension("docx"), None);
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(ResourceType::from_code(9999), None);
    }
}
