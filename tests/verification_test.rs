use mailcode::extract_verification_code;

#[test]
fn test_code_in_subject() {
    let code = extract_verification_code("Your verification code is 123-456", "", "");

    assert_eq!(code.as_deref(), Some("123456"));
}

#[test]
fn test_pin_in_body() {
    let code = extract_verification_code("", "Your PIN is 4821", "");

    assert_eq!(code.as_deref(), Some("4821"));
}

#[test]
fn test_digits_without_keyword() {
    assert_eq!(
        extract_verification_code("", "Copyright 2024 Example Corp", ""),
        None
    );
    assert_eq!(
        extract_verification_code("", "Invoice 784512 attached", ""),
        None
    );
}

#[test]
fn test_year_next_to_keyword_is_rejected() {
    // Calendar-year suppression applies even adjacent to a keyword
    assert_eq!(extract_verification_code("", "your code is 2037", ""), None);
}

#[test]
fn test_zip_code_rejected() {
    assert_eq!(
        extract_verification_code("", "Use code at our address: 90210 Postal Way", ""),
        None
    );
}

#[test]
fn test_street_number_rejected() {
    assert_eq!(
        extract_verification_code("", "Enter code at 12345 Main Street today", ""),
        None
    );
}

#[test]
fn test_house_number_rejected_regardless_of_length() {
    assert_eq!(
        extract_verification_code("", "Your code: 123456 Oak Avenue branch", ""),
        None
    );
}

#[test]
fn test_subject_takes_priority_over_body() {
    let code = extract_verification_code("Login code 111222", "Your code is 333444", "");

    assert_eq!(code.as_deref(), Some("111222"));
}

#[test]
fn test_rejected_subject_falls_back_to_body() {
    let code = extract_verification_code("Security code 2024", "Your login code is 775533", "");

    assert_eq!(code.as_deref(), Some("775533"));
}

#[test]
fn test_code_before_keyword() {
    let code = extract_verification_code("", "482913 is your verification code", "");

    assert_eq!(code.as_deref(), Some("482913"));
}

#[test]
fn test_html_body_fallback() {
    let html = "<html><style>p{color:red}</style>\
                <p>Your one-time code: <b>987654</b></p></html>";
    let code = extract_verification_code("", "", html);

    assert_eq!(code.as_deref(), Some("987654"));
}

#[test]
fn test_cjk_keyword() {
    let code = extract_verification_code("", "您的验证码是 5847", "");

    assert_eq!(code.as_deref(), Some("5847"));
}

#[test]
fn test_separated_digits_are_joined() {
    let code = extract_verification_code("", "OTP: 9 4 2 8 3 1", "");

    assert_eq!(code.as_deref(), Some("942831"));
}

#[test]
fn test_long_digit_run_not_matched() {
    // Nine digits cannot be a 4-8 digit code, even partially
    assert_eq!(
        extract_verification_code("", "Your code is 123456789", ""),
        None
    );
}

#[test]
fn test_short_run_not_matched() {
    assert_eq!(extract_verification_code("", "Your code is 123", ""), None);
}

#[test]
fn test_empty_inputs() {
    assert_eq!(extract_verification_code("", "", ""), None);
}
