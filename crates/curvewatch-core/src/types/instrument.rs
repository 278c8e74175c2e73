//! Treasury instrument types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Federal government bond type, as labelled in the Treasury export.
///
/// Unknown labels are preserved in `Other` so new titles flow through the
/// analytics untouched instead of failing the load.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstrumentType {
    /// Zero-coupon nominal bond (LTN).
    Prefixado,
    /// Nominal bond with semi-annual coupons (NTN-F).
    PrefixadoJurosSemestrais,
    /// Zero-coupon IPCA-linked bond (NTN-B Principal).
    Ipca,
    /// IPCA-linked bond with semi-annual coupons (NTN-B).
    IpcaJurosSemestrais,
    /// Floating bond indexed to the Selic rate (LFT).
    Selic,
    /// IGP-M-linked bond with semi-annual coupons (NTN-C).
    IgpmJurosSemestrais,
    /// Retirement income bond.
    RendaMais,
    /// Education savings bond.
    EducaMais,
    /// Any other label, kept verbatim.
    Other(String),
}

impl InstrumentType {
    /// Maps an export label to an instrument type. Matching ignores case and
    /// surrounding whitespace.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_lowercase().as_str() {
            "tesouro prefixado" => Self::Prefixado,
            "tesouro prefixado com juros semestrais" => Self::PrefixadoJurosSemestrais,
            "tesouro ipca+" => Self::Ipca,
            "tesouro ipca+ com juros semestrais" => Self::IpcaJurosSemestrais,
            "tesouro selic" => Self::Selic,
            "tesouro igpm+ com juros semestrais" => Self::IgpmJurosSemestrais,
            "tesouro renda+ aposentadoria extra" => Self::RendaMais,
            "tesouro educa+" => Self::EducaMais,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// The export label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Prefixado => "Tesouro Prefixado",
            Self::PrefixadoJurosSemestrais => "Tesouro Prefixado com Juros Semestrais",
            Self::Ipca => "Tesouro IPCA+",
            Self::IpcaJurosSemestrais => "Tesouro IPCA+ com Juros Semestrais",
            Self::Selic => "Tesouro Selic",
            Self::IgpmJurosSemestrais => "Tesouro IGPM+ com Juros Semestrais",
            Self::RendaMais => "Tesouro Renda+ Aposentadoria Extra",
            Self::EducaMais => "Tesouro Educa+",
            Self::Other(label) => label,
        }
    }

    /// Label without the leading "Tesouro ".
    #[must_use]
    pub fn short_name(&self) -> &str {
        let label = self.label();
        label.strip_prefix("Tesouro ").unwrap_or(label)
    }

    /// True for bonds whose principal is indexed to consumer inflation.
    #[must_use]
    pub fn is_inflation_linked(&self) -> bool {
        matches!(
            self,
            Self::Ipca | Self::IpcaJurosSemestrais | Self::IgpmJurosSemestrais
        )
    }

    /// True for nominal fixed-rate bonds.
    #[must_use]
    pub fn is_fixed_rate(&self) -> bool {
        matches!(self, Self::Prefixado | Self::PrefixadoJurosSemestrais)
    }
}

impl From<String> for InstrumentType {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<&str> for InstrumentType {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

impl From<InstrumentType> for String {
    fn from(instrument: InstrumentType) -> Self {
        instrument.label().to_string()
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        for instrument in [
            InstrumentType::Prefixado,
            InstrumentType::PrefixadoJurosSemestrais,
            InstrumentType::Ipca,
            InstrumentType::IpcaJurosSemestrais,
            InstrumentType::Selic,
            InstrumentType::IgpmJurosSemestrais,
            InstrumentType::RendaMais,
            InstrumentType::EducaMais,
        ] {
            assert_eq!(InstrumentType::from_label(instrument.label()), instrument);
        }
    }

    #[test]
    fn test_case_and_whitespace() {
        assert_eq!(
            InstrumentType::from_label("  TESOURO IPCA+ com juros semestrais "),
            InstrumentType::IpcaJurosSemestrais
        );
    }

    #[test]
    fn test_unknown_label_preserved() {
        let other = InstrumentType::from_label("Tesouro Novo Titulo");
        assert_eq!(other, InstrumentType::Other("Tesouro Novo Titulo".into()));
        assert_eq!(other.short_name(), "Novo Titulo");
    }

    #[test]
    fn test_classification() {
        assert!(InstrumentType::Ipca.is_inflation_linked());
        assert!(!InstrumentType::Ipca.is_fixed_rate());
        assert!(InstrumentType::Prefixado.is_fixed_rate());
        assert!(!InstrumentType::Selic.is_fixed_rate());
        assert!(!InstrumentType::Selic.is_inflation_linked());
    }

    #[test]
    fn test_serde_uses_label() {
        let json = serde_json::to_string(&InstrumentType::Ipca).unwrap();
        assert_eq!(json, "\"Tesouro IPCA+\"");
        let back: InstrumentType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, InstrumentType::Ipca);
    }
}
