#[test]
fn select_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/select_pass/*.rs");
    t.compile_fail("tests/ui/select_fail/*.rs");
}

#[test]
fn dml_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/dml_pass/*.rs");
    t.compile_fail("tests/ui/dml_fail/*.rs");
}
