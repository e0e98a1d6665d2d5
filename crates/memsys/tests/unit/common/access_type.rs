//! Access Type Unit Tests.

use memsys_core::AccessType;

#[test]
fn only_stores_write() {
    assert!(!AccessType::Ifetch.is_write());
    assert!(!AccessType::Load.is_write());
    assert!(AccessType::Store.is_write());
}

#[test]
fn all_lists_each_type_once() {
    let names: Vec<_> = AccessType::ALL.iter().map(|a| a.name()).collect();
    assert_eq!(names, ["ifetch", "load", "store"]);
}
