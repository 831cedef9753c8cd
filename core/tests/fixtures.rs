use verigen_core::gauntlet;

#[test]
fn shipped_fixtures_pass() {
    let report = gauntlet::run();
    assert_eq!(report.total, 5, "{}", report.log);
    assert!(report.success(), "{}", report.log);
}
