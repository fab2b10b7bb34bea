//! Build identity token prefixed to the qualified package version.

use std::fmt;

use crate::consts::RELEASE_IDENTITY;

/// Who a package was built for: a release, or a developer's private build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildIdentity {
  Release,
  User(String),
}

impl BuildIdentity {
  /// Pick the identity from the release flag, falling back to the invoking user.
  pub fn detect(release: bool) -> Self {
    if release {
      BuildIdentity::Release
    } else {
      BuildIdentity::User(whoami::username())
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      BuildIdentity::Release => RELEASE_IDENTITY,
      BuildIdentity::User(name) => name,
    }
  }
}

impl fmt::Display for BuildIdentity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
