pub const CONTRIBUTION_EMAIL: &str = "techvalut6@gmail.com";
const CONTRIBUTION_SUBJECT: &str = "Civil Code PDF Contribution";
const CONTRIBUTION_BODY: &str = "Dear Civil Codes Team,

I would like to contribute a civil code PDF to your platform.

PDF Title:
Brief Description:
My Name (for credit):

Thank you for considering my contribution.

Best regards,";

/// Pre-filled mail composition link for contributing a document.
pub fn contribution_mailto() -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        CONTRIBUTION_EMAIL,
        urlencoding::encode(CONTRIBUTION_SUBJECT),
        urlencoding::encode(CONTRIBUTION_BODY),
    )
}

pub fn render() -> String {
    format!(
        "── Contribute to Our Community ──\n\
         Help us grow our collection of civil codes. If you have valuable PDFs that are missing\n\
         from our site, please contribute! We'll credit you in the listing description.\n\
         You can mail us at {CONTRIBUTION_EMAIL} (command: contribute)\n\
         Made with ♥ for the Civil Engineering Community"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mailto_encodes_subject_and_body() {
        let link = contribution_mailto();
        assert!(link.starts_with("mailto:techvalut6@gmail.com?subject=Civil%20Code%20PDF%20Contribution&body="));
        assert!(link.contains("Dear%20Civil%20Codes%20Team%2C%0A%0A"));
        assert!(!link.contains(' '));
        assert!(!link.contains('\n'));
    }
}
