use crate::compositor::position::Position;

const CONTAINER: (u32, u32) = (800, 600);
const ITEM: (u32, u32) = (100, 30);
const MARGIN: (u32, u32) = (20, 20);

#[test]
fn test_anchor_formula_all_nine_positions() {
    let cases = [
        (Position::TopLeft, (20, 20)),
        (Position::TopCenter, (350, 20)),
        (Position::TopRight, (680, 20)),
        (Position::CenterLeft, (20, 285)),
        (Position::Center, (350, 285)),
        (Position::CenterRight, (680, 285)),
        (Position::BottomLeft, (20, 550)),
        (Position::BottomCenter, (350, 550)),
        (Position::BottomRight, (680, 550)),
    ];

    for (position, expected) in cases {
        assert_eq!(
            position.anchor(CONTAINER, ITEM, MARGIN),
            expected,
            "wrong anchor for {}",
            position
        );
    }
}

#[test]
fn test_margins_ignored_on_centered_axes() {
    // Center uses neither margin; the center row/column ignore one of them.
    assert_eq!(
        Position::Center.anchor(CONTAINER, ITEM, (50, 70)),
        (350, 285)
    );
    assert_eq!(
        Position::TopCenter.anchor(CONTAINER, ITEM, (50, 70)),
        (350, 70)
    );
    assert_eq!(
        Position::CenterLeft.anchor(CONTAINER, ITEM, (50, 70)),
        (50, 285)
    );
}

#[test]
fn test_oversized_item_yields_negative_coordinates() {
    let container = (100, 100);
    let item = (200, 50);

    assert_eq!(Position::Center.anchor(container, item, (0, 0)), (-50, 25));
    assert_eq!(
        Position::BottomRight.anchor(container, item, (10, 10)),
        (-110, 40)
    );
}

#[test]
fn test_parse_canonical_names() {
    for position in Position::ALL {
        let resolved = Position::parse(position.as_str());
        assert_eq!(*resolved.value(), position);
        assert!(!resolved.is_fallback());
    }
}

#[test]
fn test_parse_accepts_middle_aliases() {
    assert_eq!(
        *Position::parse("middle-left").value(),
        Position::CenterLeft
    );
    assert_eq!(
        *Position::parse("middle-right").value(),
        Position::CenterRight
    );
    assert!(!Position::parse("middle-left").is_fallback());
}

#[test]
fn test_parse_is_case_and_whitespace_insensitive() {
    let resolved = Position::parse("  Bottom-Right ");
    assert_eq!(*resolved.value(), Position::BottomRight);
    assert!(!resolved.is_fallback());
}

#[test]
fn test_unknown_name_falls_back_to_bottom_right() {
    let resolved = Position::parse("under-the-bed");
    assert_eq!(*resolved.value(), Position::BottomRight);

    let fallback = resolved.fallback().expect("fallback diagnostic expected");
    assert_eq!(fallback.requested, "under-the-bed");

    // The fallback value must anchor exactly like an explicit bottom-right.
    assert_eq!(
        resolved.value().anchor(CONTAINER, ITEM, MARGIN),
        Position::BottomRight.anchor(CONTAINER, ITEM, MARGIN)
    );
}

#[test]
fn test_serde_uses_kebab_case() {
    let json = serde_json::to_string(&Position::BottomRight).unwrap();
    assert_eq!(json, "\"bottom-right\"");

    let parsed: Position = serde_json::from_str("\"top-center\"").unwrap();
    assert_eq!(parsed, Position::TopCenter);
}
