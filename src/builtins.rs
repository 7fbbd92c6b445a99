//! Built-in commands
//!
//! `exit` and `jobs` are thin enough to live in the line actor's loop; the
//! directory change gets a function of its own so its argument and error
//! rules are testable.

use nix::errno::Errno;
use nix::unistd::chdir;

use crate::error::{Error, Result};

/// `cd <dir>`, exactly one argument. ENOENT/ENOTDIR map to the
/// "No such directory" message; any other failure is reported generically
/// and the shell keeps running.
pub fn change_dir(args: &[String]) -> Result<()> {
    if args.len() != 1 {
        return Err(Error::CdUsage);
    }

    let target = &args[0];
    match chdir(target.as_str()) {
        Ok(()) => {
            debug!(dir = target.as_str(), "changed working directory");
            Ok(())
        }
        Err(Errno::ENOENT) | Err(Errno::ENOTDIR) => Err(Error::CdNoSuchDirectory {
            path: target.clone(),
        }),
        Err(errno) => Err(Error::CdFailed {
            path: target.clone(),
            errno,
        }),
    }
}
