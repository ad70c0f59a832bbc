//! Credential callback for clones
//!
//! Tries, depending on what the remote allows: default credentials, the SSH
//! agent, well-known key files in ~/.ssh/, then git credential helpers.

use git2::{Cred, CredentialType, Error, ErrorClass, ErrorCode, RemoteCallbacks};

const SSH_KEY_NAMES: &[&str] = &["id_ed25519", "id_rsa", "id_ecdsa"];

fn auth_error(message: &str) -> Error {
    Error::new(ErrorCode::Auth, ErrorClass::Http, message)
}

fn ssh_key_from_files(username: &str) -> Result<Cred, Error> {
    let ssh_dir = dirs::home_dir().unwrap_or_default().join(".ssh");

    SSH_KEY_NAMES
        .iter()
        .map(|name| (ssh_dir.join(name), ssh_dir.join(format!("{name}.pub"))))
        .filter(|(private_key, _)| private_key.exists())
        .find_map(|(private_key, public_key)| {
            let public_key = public_key.exists().then_some(public_key.as_path());
            Cred::ssh_key(username, public_key, &private_key, None).ok()
        })
        .ok_or_else(|| auth_error("no usable SSH key found"))
}

fn credential_helper(url: &str, username: Option<&str>) -> Result<Cred, Error> {
    let config = git2::Config::open_default().or_else(|_| git2::Config::new())?;

    Cred::credential_helper(&config, url, username)
        .or_else(|_| Cred::userpass_plaintext(username.unwrap_or(""), ""))
        .map_err(|_| auth_error("authentication failed"))
}

/// Install the credential callback on `callbacks`
pub fn install_credential_callback(callbacks: &mut RemoteCallbacks) {
    callbacks.credentials(|url, username_from_url, allowed| {
        if allowed.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }

        if allowed.contains(CredentialType::SSH_KEY) {
            let username = username_from_url.unwrap_or("git");
            return Cred::ssh_key_from_agent(username).or_else(|_| ssh_key_from_files(username));
        }

        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            return credential_helper(url, username_from_url);
        }

        Err(auth_error("no supported credential type"))
    });
}
