use webscope_core::FieldRole;

/// Reported for the submit role whenever any submit candidate matches
pub const CANONICAL_SUBMIT: &str = "button[type='submit']";

const USERNAME: &[&str] = &[
    "input[autocomplete='username']",
    "input[type='text'][name*='user']",
    "input[type='email']",
    "input[name='loginfmt']",
    "input[id*='user']",
    "input[name='login']",
    "input[name='email']",
    "input[id*='email']",
    "input[placeholder*='email']",
    "input[placeholder*='username']",
    "input[aria-label*='username']",
    "input[aria-label*='email']",
    "input[name='session[username_or_email]']",
    "input[id='identifierId']",
    "input[type='text'][id*='login']",
];

const PASSWORD: &[&str] = &[
    "input[autocomplete='current-password']",
    "input[type='password'][name*='pass']",
    "input[name='passwd']",
    "input[id*='pass']",
    "input[type='password']",
    "input[aria-label*='password']",
    "input[placeholder*='password']",
    "input[autocomplete='new-password']",
    "input[name='session[password]']",
    "input[type='password'][id*='login']",
    "input[id='Passwd']",
];

const TOTP: &[&str] = &[
    "input[autocomplete='one-time-code']",
    "input[name*='otp']",
    "input[name*='totp']",
    "input[type='text'][id*='otp']",
    "input[placeholder*='one-time code']",
    "input[aria-label*='2fa']",
    "input[aria-label*='security code']",
    "input[type='text'][name*='twofactor']",
    "input[name='verification_code']",
];

const SUBMIT: &[&str] = &[
    "button[type='submit']",
    "input[type='submit']",
    "button[name='login']",
    "button[id*='signin']",
];

/// Role to candidate list, in evaluation order. Earlier selectors win.
pub const CANDIDATES: [(FieldRole, &[&str]); 4] = [
    (FieldRole::Username, USERNAME),
    (FieldRole::Password, PASSWORD),
    (FieldRole::Totp, TOTP),
    (FieldRole::Submit, SUBMIT),
];

pub fn candidates(role: FieldRole) -> &'static [&'static str] {
    match role {
        FieldRole::Username => USERNAME,
        FieldRole::Password => PASSWORD,
        FieldRole::Totp => TOTP,
        FieldRole::Submit => SUBMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;
    use std::collections::HashSet;

    #[test]
    fn test_mapping_follows_evaluation_order() {
        let roles: Vec<FieldRole> = CANDIDATES.iter().map(|(role, _)| *role).collect();
        assert_eq!(roles, FieldRole::ALL.to_vec());

        for (role, list) in CANDIDATES {
            assert_eq!(candidates(role), list);
        }
    }

    #[test]
    fn test_all_candidates_parse() {
        for (role, list) in CANDIDATES {
            for selector in list {
                assert!(
                    Selector::parse(selector).is_ok(),
                    "{} candidate does not parse: {}",
                    role,
                    selector
                );
            }
        }
    }

    #[test]
    fn test_no_duplicates_within_a_role() {
        for (role, list) in CANDIDATES {
            let unique: HashSet<_> = list.iter().collect();
            assert_eq!(unique.len(), list.len(), "duplicate {} candidate", role);
        }
    }

    #[test]
    fn test_canonical_submit_is_a_candidate() {
        assert_eq!(candidates(FieldRole::Submit)[0], CANONICAL_SUBMIT);
    }
}
