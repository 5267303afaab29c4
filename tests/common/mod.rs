//! Common test utilities and helpers
//!
//! A fake TF client is a `/bin/sh` run in a directory holding an `@`
//! script: the runner starts the tool as `sh @` and writes the command
//! line to its stdin, so the script sees exactly what `tf` would.

#![allow(dead_code)]

pub mod fake_source;

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tfvc_scm::domain::value_objects::tf_tool::TfTool;
use tfvc_scm::infrastructure::process::TfCommandRunner;
use tfvc_scm::infrastructure::tfvc::Repository;

pub const STATUS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<status>
  <pending-changes>
    <pending-change server-item="$/Fabrikam/Main/README.md" version="7" owner="bob" date="2017-02-24T13:50:03.103-05:00" lock="none" change-type="edit" workspace="ws1" computer="pc" local-item="/ws/README.md"/>
    <pending-change server-item="$/Fabrikam/Main/gone.txt" version="5" owner="bob" date="2017-02-24T13:50:03.103-05:00" lock="none" change-type="delete" workspace="ws1" computer="pc" local-item="/ws/gone.txt"/>
    <pending-change server-item="$/Fabrikam/Main/merged.txt" version="9" owner="bob" date="2017-02-24T13:50:03.103-05:00" lock="none" change-type="merge, edit" workspace="ws1" computer="pc" local-item="/ws/merged.txt"/>
  </pending-changes>
  <candidate-pending-changes>
    <pending-change server-item="$/Fabrikam/Main/untracked.txt" version="0" owner="bob" date="2017-02-24T13:50:03.103-05:00" lock="none" change-type="add" workspace="ws1" computer="pc" local-item="/ws/untracked.txt"/>
  </candidate-pending-changes>
</status>"#;

/// A fake TF client that answers the commands the crate issues
pub fn fake_tf_script() -> String {
    format!(
        r#"read line
set -- $line
case "$line" in
  *'-?'*)
    echo "Team Explorer Everywhere Command Line Client (version 14.134.0.201708161825)"
    exit 0
    ;;
esac
case "$1" in
  status)
    cat <<'XML'
{xml}
XML
    ;;
  workfold)
    echo "==============================================================================="
    echo "Workspace:  MyWorkspace"
    echo "Collection: https://tfs.local/DefaultCollection"
    echo "\$/Fabrikam/Main: /ws"
    echo "(cloaked) \$/Fabrikam/Main/bin:"
    ;;
  add)
    echo "/ws:"
    echo "new.txt"
    ;;
  undo)
    echo "/ws:"
    echo "Undoing edit: README.md"
    echo "No pending changes were found for /ws/other.txt." >&2
    echo "No pending changes were found for /ws/other.txt."
    exit 1
    ;;
  checkin)
    echo "/ws:"
    echo "Checking in edit: README.md"
    echo ""
    echo "Changeset #42 checked in."
    ;;
  print)
    case "$line" in
      *missing*)
        echo "The specified file does not exist at the specified version." >&2
        exit 1
        ;;
    esac
    echo "server content of $3"
    ;;
  *)
    echo "Unrecognized command: $1" >&2
    exit 100
    ;;
esac
"#,
        xml = STATUS_XML
    )
}

/// Directory whose `@` file is the given script
pub fn script_dir(script: &str) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("@"), script).expect("Failed to write the @ script");
    dir
}

/// `/bin/sh` stands in for the JVM client
pub fn shell_tool() -> TfTool {
    TfTool::new("/bin/sh")
}

/// Repository rooted at `root` driving the fake client
pub fn fake_repository(root: &Path) -> Repository {
    let runner = Arc::new(TfCommandRunner::new().with_timeout(Some(10)));
    Repository::new(shell_tool(), runner, root)
}
