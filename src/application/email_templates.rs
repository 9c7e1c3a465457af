//! HTML bodies for outbound mail.

pub fn password_reset_otp_email(code: &str, valid_minutes: i64) -> (String, String) {
    let subject = "Password Reset OTP".to_string();
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <h2>Password Reset Request</h2>
    <p>You requested a password reset for your account.</p>
    <p>Your OTP is: <strong style="font-size: 24px; color: #3498db;">{code}</strong></p>
    <p>This OTP will expire in {valid_minutes} minutes.</p>
    <p>If you didn't request this, please ignore this email.</p>
</div>"#
    );
    (subject, html)
}
