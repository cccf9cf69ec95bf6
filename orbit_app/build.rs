// Compiles the GLSL sources in ../shaders to SPIR-V next to them.
// Requires glslc from the Vulkan SDK; skipped with a warning when absent.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

fn find_glslc() -> Option<PathBuf> {
    if let Ok(sdk) = env::var("VULKAN_SDK") {
        let candidate = if cfg!(target_os = "windows") {
            Path::new(&sdk).join("Bin").join("glslc.exe")
        } else {
            Path::new(&sdk).join("bin").join("glslc")
        };
        if candidate.exists() {
            return Some(candidate);
        }
    }
    // Fall back to glslc on PATH.
    let probe = Command::new("glslc").arg("--version").status();
    match probe {
        Ok(status) if status.success() => Some(PathBuf::from("glslc")),
        _ => None,
    }
}

fn main() {
    println!("cargo:rerun-if-changed=../shaders");
    println!("cargo:rerun-if-env-changed=VULKAN_SDK");

    if env::var("SKIP_SHADERS").is_ok() {
        eprintln!("info: skipping shader compilation (SKIP_SHADERS set)");
        return;
    }

    let glslc = match find_glslc() {
        Some(path) => path,
        None => {
            eprintln!("warning: glslc not found, shader compilation skipped");
            eprintln!("hint: install the Vulkan SDK or set VULKAN_SDK");
            return;
        }
    };

    let shader_dir = PathBuf::from("../shaders");
    let entries = match std::fs::read_dir(&shader_dir) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("warning: cannot read {:?}: {}", shader_dir, e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let is_shader = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("vert") | Some("frag")
        );
        if !is_shader {
            continue;
        }

        let mut out_name = path.file_name().unwrap().to_os_string();
        out_name.push(".spv");
        let out_file = shader_dir.join(out_name);

        let needs_compile = match (std::fs::metadata(&path), std::fs::metadata(&out_file)) {
            (Ok(src), Ok(dst)) => match (src.modified(), dst.modified()) {
                (Ok(src_time), Ok(dst_time)) => src_time > dst_time,
                _ => true,
            },
            _ => true,
        };
        if !needs_compile {
            continue;
        }

        let status = Command::new(&glslc).arg(&path).arg("-o").arg(&out_file).status();
        match status {
            Ok(s) if s.success() => {
                eprintln!("info: compiled {:?}", path.file_name().unwrap());
            }
            Ok(s) => panic!(
                "glslc failed for {:?} with exit code {}",
                path,
                s.code().unwrap_or(-1)
            ),
            Err(e) => panic!("failed to run glslc for {:?}: {}", path, e),
        }
    }
}
