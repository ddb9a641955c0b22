use std::cell::RefCell;
use std::rc::Rc;

use calc_core::calculators::find;
use calc_state::{
    AddressBar, CalculatorSession, MemoryAddressBar, Navigator, QueryString, UrlCodec, activate,
    active_calculator, build_share_link,
};
use pretty_assertions::assert_eq;

const PAGE: &str = "https://calc.example/";

fn mounted(
    id: &str,
    navigator: &mut Navigator,
) -> Rc<RefCell<CalculatorSession>> {
    let session = Rc::new(RefCell::new(CalculatorSession::mount(
        find(id).unwrap(),
        navigator.address_bar(),
    )));
    CalculatorSession::attach(&session, navigator);
    session
}

fn params(bar: &Rc<RefCell<MemoryAddressBar>>) -> Vec<(String, String)> {
    bar.borrow()
        .query()
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

// =============================================================================
// Namespace isolation
// =============================================================================

#[test]
fn editing_one_calculator_leaves_the_other_untouched() {
    let bar = MemoryAddressBar::shared(PAGE);
    let mut navigator = Navigator::new(bar.clone());
    let emi = mounted("emi", &mut navigator);
    let rd = mounted("rd", &mut navigator);

    rd.borrow_mut().update_field("amount", "2500").unwrap();
    emi.borrow_mut().update_field("tenure", "36").unwrap();
    let rd_before = rd.borrow().snapshot();
    emi.borrow_mut().update_field("loanAmount", "650000").unwrap();
    emi.borrow_mut().reset();

    assert_eq!(rd.borrow().snapshot(), rd_before);
    assert_eq!(
        params(&bar),
        vec![("rd_amount".to_string(), "2500".to_string())]
    );
}

#[test]
fn reserved_key_survives_edits_and_resets() {
    let bar = MemoryAddressBar::shared("https://calc.example/?in=sip&sip_amount=9000");
    let mut navigator = Navigator::new(bar.clone());
    let sip = mounted("sip", &mut navigator);

    sip.borrow_mut().update_field("tenure", "20").unwrap();
    sip.borrow_mut().reset();

    assert_eq!(bar.borrow().href(), "https://calc.example/?in=sip");
}

// =============================================================================
// Round trip
// =============================================================================

#[test]
fn fields_written_by_edits_decode_back() {
    let bar = MemoryAddressBar::shared(PAGE);
    let mut navigator = Navigator::new(bar.clone());
    let gst = mounted("gst", &mut navigator);

    gst.borrow_mut().update_field("amount", "12,999.5").unwrap();
    gst.borrow_mut().update_field("mode", "inclusive").unwrap();

    let decoded = UrlCodec::new(find("gst").unwrap()).decode(&bar.borrow().query());
    assert_eq!(decoded, gst.borrow().snapshot());
}

#[test]
fn encoded_query_re_encodes_identically() {
    let codec = UrlCodec::new(find("income-tax").unwrap());
    let encoded = "tax_income=2400000&tax_deductions=200000&tax_regime=old";

    let fields = codec.decode(&QueryString::parse(encoded));

    assert_eq!(codec.encode(&fields).to_string(), encoded);
}

#[test]
fn malformed_query_falls_back_to_defaults() {
    let bar = MemoryAddressBar::shared("https://calc.example/?emi_loanAmount=1e9&emi_tenure=%FF&&emi_=5");
    let mut navigator = Navigator::new(bar);
    let emi = mounted("emi", &mut navigator);

    assert_eq!(emi.borrow().snapshot(), find("emi").unwrap().defaults());
    assert!(emi.borrow().result().is_some());
}

// =============================================================================
// History
// =============================================================================

#[test]
fn ordinary_edits_add_no_history_entries() {
    let bar = MemoryAddressBar::shared(PAGE);
    let mut navigator = Navigator::new(bar.clone());
    let emi = mounted("emi", &mut navigator);

    for value in ["1", "12", "120", "1200"] {
        emi.borrow_mut().update_field("tenure", value).unwrap();
    }

    assert_eq!(bar.borrow().len(), 1);
    assert!(!navigator.back());
}

#[test]
fn back_and_forward_rehydrate_every_attached_session() {
    let bar = MemoryAddressBar::shared(PAGE);
    let mut navigator = Navigator::new(bar.clone());
    let emi = mounted("emi", &mut navigator);
    let rd = mounted("rd", &mut navigator);

    emi.borrow_mut().update_field("tenure", "36").unwrap();
    emi.borrow().checkpoint();
    emi.borrow_mut().update_field("tenure", "48").unwrap();
    rd.borrow_mut().update_field("tenure", "24").unwrap();

    assert!(navigator.back());
    assert_eq!(emi.borrow().store().get("tenure"), Some("36"));
    assert_eq!(rd.borrow().store().get("tenure"), Some("60"));

    assert!(navigator.forward());
    assert_eq!(emi.borrow().store().get("tenure"), Some("48"));
    assert_eq!(rd.borrow().store().get("tenure"), Some("24"));
}

#[test]
fn switching_calculators_can_be_undone() {
    let bar = MemoryAddressBar::shared("https://calc.example/?in=emi");
    let mut navigator = Navigator::new(bar.clone());
    let address_bar = navigator.address_bar();

    activate(&address_bar, "fd").unwrap();
    assert_eq!(active_calculator(&bar.borrow().query()).map(|spec| spec.id), Some("fd"));

    navigator.back();
    assert_eq!(active_calculator(&bar.borrow().query()).map(|spec| spec.id), Some("emi"));
}

#[test]
fn opening_a_shared_link_hydrates_the_session() {
    let spec = find("cagr").unwrap();
    let mut fields = spec.defaults();
    fields.insert("finalValue".to_string(), "300000".to_string());
    let link = build_share_link("https://calc.example/", spec, &fields);

    let mut navigator = Navigator::new(MemoryAddressBar::shared(PAGE));
    let cagr = mounted("cagr", &mut navigator);
    navigator.navigate(&link);

    assert_eq!(cagr.borrow().snapshot(), fields);
    assert!(cagr.borrow().result().is_some());
}
