use proforma_core::comps::{ComparableProperty, ComparableSource, CompsError, MIN_COMPARABLES};
use proforma_core::deal::engine::calculate_deal_metrics;
use proforma_core::deal::input::DealInput;

struct OfflineSource;

impl ComparableSource for OfflineSource {
    fn find_comparables(&self, _address: &str) -> Result<Vec<ComparableProperty>, CompsError> {
        Err(CompsError::Unavailable("upstream model unreachable".into()))
    }
}

/// Returns its canned list when it is large enough, mirroring the minimum
/// result-count contract.
struct CannedSource(Vec<ComparableProperty>);

impl ComparableSource for CannedSource {
    fn find_comparables(&self, _address: &str) -> Result<Vec<ComparableProperty>, CompsError> {
        if self.0.len() < MIN_COMPARABLES {
            return Err(CompsError::InsufficientResults(self.0.len()));
        }
        Ok(self.0.clone())
    }
}

fn comp(address: &str) -> ComparableProperty {
    ComparableProperty {
        address: address.into(),
        rent: 3_900.0,
        sale_price: 485_000.0,
        square_footage: 1_850.0,
    }
}

#[test]
fn test_lookup_failure_leaves_analysis_untouched() {
    let input = DealInput::default();
    let before = calculate_deal_metrics(&input);

    let err = OfflineSource.find_comparables("125 Maple Ave").unwrap_err();
    assert!(err.is_retryable());

    let after = calculate_deal_metrics(&input);
    assert_eq!(before, after);
}

#[test]
fn test_undersized_result_set_is_rejected_and_not_retryable() {
    let source = CannedSource(vec![comp("12 Oak St"), comp("14 Oak St")]);
    let err = source.find_comparables("125 Maple Ave").unwrap_err();
    assert!(!err.is_retryable());
    assert!(err.to_string().contains('3'));
}

#[test]
fn test_conforming_source_returns_ordered_comparables() {
    let source = CannedSource(vec![
        comp("12 Oak St"),
        comp("14 Oak St"),
        comp("16 Oak St"),
    ]);
    let comps = source.find_comparables("125 Maple Ave").unwrap();
    assert_eq!(comps.len(), 3);
    assert_eq!(comps[0].address, "12 Oak St");
}
