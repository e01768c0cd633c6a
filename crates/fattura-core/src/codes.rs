//! # Closed Code Lists
//!
//! The enumerated values the government schema accepts for the fields of a
//! simplified invoice.
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │  DocumentType    │   │  FiscalRegime    │   │   VatNature      │
//! │  ──────────────  │   │  ──────────────  │   │  ──────────────  │
//! │  TD07 invoice    │   │  RF01 ordinario  │   │  N1 excluded     │
//! │  TD08 credit     │   │  RF02 ... RF19   │   │  N2 not subject  │
//! │  TD09 debit      │   │  (RF03 retired)  │   │  ...  N7         │
//! └──────────────────┘   └──────────────────┘   └──────────────────┘
//! ```
//!
//! Every list implements `FromStr` with the wire code and serializes back to
//! it, so the web form keeps sending plain strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates the code enum, its `ALL` table and the string conversions.
macro_rules! code_list {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal, $label:literal; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
        #[ts(export)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $code)] $variant, )+
        }

        impl $name {
            /// Every accepted value, in schema order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The code as written in the schema.
            pub const fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            /// Human-readable label shown next to the code in the form.
            pub const fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// All codes as owned strings (for `NotAllowed` errors).
            pub fn codes() -> Vec<String> {
                Self::ALL.iter().map(|c| c.code().to_string()).collect()
            }
        }

        impl FromStr for $name {
            type Err = UnknownCode;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|c| c.code() == s)
                    .ok_or_else(|| UnknownCode(s.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

/// A string that is not part of a code list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown code '{0}'")]
pub struct UnknownCode(pub String);

code_list! {
    /// Document types of the simplified format.
    DocumentType {
        Td07 => "TD07", "Fattura semplificata";
        Td08 => "TD08", "Nota di credito semplificata";
        Td09 => "TD09", "Nota di debito semplificata";
    }
}

code_list! {
    /// Fiscal regime of the supplier (RegimeFiscale).
    FiscalRegime {
        Rf01 => "RF01", "Ordinario";
        Rf02 => "RF02", "Contribuenti minimi";
        Rf04 => "RF04", "Agricoltura e attività connesse e pesca";
        Rf05 => "RF05", "Vendita sali e tabacchi";
        Rf06 => "RF06", "Commercio fiammiferi";
        Rf07 => "RF07", "Editoria";
        Rf08 => "RF08", "Gestione servizi telefonia pubblica";
        Rf09 => "RF09", "Rivendita documenti di trasporto pubblico e di sosta";
        Rf10 => "RF10", "Intrattenimenti, giochi e altre attività";
        Rf11 => "RF11", "Agenzie viaggi e turismo";
        Rf12 => "RF12", "Agriturismo";
        Rf13 => "RF13", "Vendite a domicilio";
        Rf14 => "RF14", "Rivendita beni usati, oggetti d'arte, antiquariato";
        Rf15 => "RF15", "Agenzie di vendite all'asta";
        Rf16 => "RF16", "IVA per cassa P.A.";
        Rf17 => "RF17", "IVA per cassa";
        Rf18 => "RF18", "Altro";
        Rf19 => "RF19", "Regime forfettario";
    }
}

code_list! {
    /// Reason a line is not taxed at a standard rate (Natura).
    VatNature {
        N1 => "N1", "Escluse ex art. 15";
        N2 => "N2", "Non soggette";
        N3 => "N3", "Non imponibili";
        N4 => "N4", "Esenti";
        N5 => "N5", "Regime del margine / IVA non esposta";
        N6 => "N6", "Inversione contabile";
        N7 => "N7", "IVA assolta in altro stato UE";
    }
}

impl Default for DocumentType {
    fn default() -> Self {
        DocumentType::Td07
    }
}

impl Default for FiscalRegime {
    fn default() -> Self {
        FiscalRegime::Rf01
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
