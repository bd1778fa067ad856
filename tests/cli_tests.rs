#[test]
fn test_cli_examples() {
    trycmd::TestCases::new().case("README.md");
}

#[test]
fn test_cli_odds() {
    trycmd::TestCases::new().case("tests/odds.trycmd");
}

#[test]
fn test_cli_roll() {
    trycmd::TestCases::new().case("tests/roll.trycmd");
}

#[test]
fn test_cli_errors() {
    trycmd::TestCases::new().case("tests/errors.trycmd");
}
