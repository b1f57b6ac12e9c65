//! Page request validation and page metadata.

use deal_valuation::config::MAX_PAGE_SIZE;
use deal_valuation::pagination::{build_page_info, compute_offset, validate};
use deal_valuation::{DealError, PageRequest};

#[test]
fn twenty_five_records_make_three_pages_of_ten() {
    let info = build_page_info(PageRequest::new(3, 10).unwrap(), 25);
    assert_eq!(info.page_count, 3);
    assert_eq!(info.offset, 20);
    assert_eq!(info.current_page, 3);
    assert_eq!(info.previous_page, Some(2));
    assert_eq!(info.next_page, None);
    assert!(!info.is_past_end());
}

#[test]
fn empty_result_has_zero_pages() {
    for size in [1, 10, 100] {
        let info = build_page_info(PageRequest::first(size).unwrap(), 0);
        assert_eq!(info.page_count, 0, "page size {size}");
        assert_eq!(info.next_page, None);
        assert!(info.is_past_end());
    }
}

#[test]
fn exact_multiple_does_not_add_a_page() {
    assert_eq!(build_page_info(PageRequest::first(10).unwrap(), 10).page_count, 1);
    assert_eq!(build_page_info(PageRequest::first(10).unwrap(), 11).page_count, 2);
}

#[test]
fn page_past_the_end_is_valid() {
    let info = build_page_info(PageRequest::new(5, 10).unwrap(), 25);
    assert_eq!(info.offset, 40);
    assert!(info.is_past_end());
    assert_eq!(info.previous_page, Some(4));
    assert_eq!(info.next_page, None);
}

#[test]
fn non_positive_values_are_rejected_not_clamped() {
    for (page, size) in [(0, 10), (1, 0), (-1, 5), (3, -2)] {
        match validate(page, size) {
            Err(DealError::InvalidPageRequest { page: p, page_size: s }) => {
                assert_eq!((p, s), (page, size));
            }
            other => panic!("expected InvalidPageRequest for ({page}, {size}), got {other:?}"),
        }
    }
}

#[test]
fn offset_formula() {
    assert_eq!(compute_offset(1, 10), 0);
    assert_eq!(compute_offset(2, 10), 10);
    assert_eq!(compute_offset(4, 7), 21);
}

#[test]
fn next_keeps_page_size() {
    let next = PageRequest::new(2, 25).unwrap().next();
    assert_eq!(next.page(), 3);
    assert_eq!(next.page_size(), 25);
    assert_eq!(next.offset(), 50);
}

#[test]
fn default_is_first_page_of_ten() {
    let page = PageRequest::default();
    assert_eq!((page.page(), page.page_size()), (1, 10));
}

// ---------------------------------------------------------------------------
// Query-string parsing
// ---------------------------------------------------------------------------

#[test]
fn from_query_defaults_missing_and_unparseable_values() {
    assert_eq!(PageRequest::from_query(None, None).unwrap(), PageRequest::default());
    assert_eq!(
        PageRequest::from_query(Some("abc"), Some("")).unwrap(),
        PageRequest::default()
    );
    assert_eq!(
        PageRequest::from_query(Some(" 3 "), Some("20")).unwrap(),
        PageRequest::new(3, 20).unwrap()
    );
}

#[test]
fn from_query_rejects_zero() {
    assert!(matches!(
        PageRequest::from_query(Some("0"), None),
        Err(DealError::InvalidPageRequest { page: 0, .. })
    ));
}

#[test]
fn from_query_caps_page_size() {
    let too_big = (MAX_PAGE_SIZE + 1).to_string();
    assert!(matches!(
        PageRequest::from_query(None, Some(&too_big)),
        Err(DealError::InvalidArgument(_))
    ));
    let max = MAX_PAGE_SIZE.to_string();
    assert_eq!(
        PageRequest::from_query(None, Some(&max)).unwrap().page_size(),
        MAX_PAGE_SIZE
    );
}

#[test]
fn page_info_serializes_camel_case() {
    let info = build_page_info(PageRequest::new(2, 10).unwrap(), 25);
    let json = serde_json::to_value(info).unwrap();
    assert_eq!(json["currentPage"], 2);
    assert_eq!(json["pageCount"], 3);
    assert_eq!(json["totalCount"], 25);
    assert_eq!(json["previousPage"], 1);
    assert_eq!(json["nextPage"], 3);
}

// ---------------------------------------------------------------------------
// Deserialization
// ---------------------------------------------------------------------------

#[test]
fn deserialized_request_is_validated() {
    let ok: PageRequest = serde_json::from_str(r#"{"page":2,"pageSize":25}"#).unwrap();
    assert_eq!(ok, PageRequest::new(2, 25).unwrap());

    for raw in [
        r#"{"page":1,"pageSize":0}"#,
        r#"{"page":0,"pageSize":10}"#,
        r#"{"page":-3,"pageSize":10}"#,
    ] {
        let err = serde_json::from_str::<PageRequest>(raw).unwrap_err();
        assert!(err.to_string().contains("Invalid page request"), "{raw}: {err}");
    }
}

#[test]
fn serialized_request_reads_back() {
    let page = PageRequest::new(4, 15).unwrap();
    let json = serde_json::to_string(&page).unwrap();
    assert_eq!(json, r#"{"page":4,"pageSize":15}"#);
    assert_eq!(serde_json::from_str::<PageRequest>(&json).unwrap(), page);
}
