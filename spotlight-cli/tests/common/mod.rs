//! Laravel project fixtures shared by the integration tests

#![allow(dead_code)]

use std::path::Path;
use tempfile::TempDir;

pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

const CLEAN_CONTROLLER: &str = r#"<?php

namespace App\Http\Controllers;

class UserController extends Controller
{
    public function index(UserService $users)
    {
        return view('users.index', ['users' => $users->paginate()]);
    }
}
"#;

const CLEAN_ROUTES: &str = r#"<?php

Route::get('/users', [UserController::class, 'index'])->name('users.index');
"#;

const CLEAN_VIEW: &str = r#"<ul>
@foreach ($users as $user)
    <li>{{ $user->name }}</li>
@endforeach
</ul>
"#;

/// A production project where every check passes
pub fn healthy_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        ".env",
        "APP_ENV=production\nAPP_DEBUG=false\nAPP_URL=https://shop.test\n\
         QUEUE_CONNECTION=redis\nSESSION_DRIVER=redis\nSESSION_SECURE_COOKIE=true\n",
    );
    for cached in ["config.php", "routes-v7.php", "compiled.php", "events.php"] {
        write(root, &format!("bootstrap/cache/{cached}"), "<?php return [];\n");
    }
    write(root, "app/Http/Controllers/UserController.php", CLEAN_CONTROLLER);
    write(root, "routes/web.php", CLEAN_ROUTES);
    write(root, "resources/views/users/index.blade.php", CLEAN_VIEW);
    dir
}

/// A production project with misconfigured security and no framework caches.
///
/// Suggestions: app-debug-enabled (critical), queue-sync-driver,
/// https-enforcement, cookie-secure-flag (high), session-driver and the four
/// cache checks (low). Everything else passes.
pub fn misconfigured_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        ".env",
        "APP_ENV=production\nAPP_DEBUG=true\nAPP_URL=http://shop.test\nSESSION_DRIVER=array\n",
    );
    dir
}

/// A local development project: production-only checks are skipped
pub fn local_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), ".env", "APP_ENV=local\nAPP_DEBUG=true\n");
    dir
}
