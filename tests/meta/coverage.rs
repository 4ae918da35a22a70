//! Checks that `src/` and `tests/unit/` mirror each other and every test file tests something

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    // Tests every source file has a unit test file at the mirrored path
    // Verified by adding a source file without a test counterpart
    #[test]
    fn test_all_src_files_have_unit_tests() {
        let src_dir = Path::new("src");
        let tests_dir = Path::new("tests/unit");

        let src_paths = collect_relative_paths(src_dir, src_dir).unwrap_or_else(|error| {
            assert!(src_dir.exists(), "Failed to read src directory: {error}");
            HashSet::new()
        });
        let test_paths = collect_relative_paths(tests_dir, tests_dir).unwrap_or_default();

        let mut missing_tests: Vec<&String> = src_paths
            .iter()
            .filter(|src_path| !is_organization_file(src_path))
            .filter(|src_path| !test_paths.contains(*src_path))
            .collect();
        missing_tests.sort();

        assert!(
            missing_tests.is_empty(),
            "The following src files/directories are missing unit test counterparts:\n{}",
            missing_tests
                .iter()
                .map(|src_path| format!("  - src/{src_path} -> tests/unit/{src_path}"))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    // Tests every unit test file corresponds to an existing source file
    // Verified by renaming a source module
    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let src_dir = Path::new("src");
        let tests_dir = Path::new("tests/unit");

        let src_paths = collect_relative_paths(src_dir, src_dir).unwrap_or_else(|error| {
            assert!(src_dir.exists(), "Failed to read src directory: {error}");
            HashSet::new()
        });
        let test_paths = collect_relative_paths(tests_dir, tests_dir).unwrap_or_default();

        let mut orphaned_tests: Vec<&String> = test_paths
            .iter()
            .filter(|test_path| !is_organization_file(test_path))
            .filter(|test_path| !src_paths.contains(*test_path))
            .collect();
        orphaned_tests.sort();

        assert!(
            orphaned_tests.is_empty(),
            "The following unit test files/directories have no corresponding src files:\n{}",
            orphaned_tests
                .iter()
                .map(|test_path| format!("  - tests/unit/{test_path} -> src/{test_path} (missing)"))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    // Tests every test source file contains at least one test function
    // Verified by adding an empty test file
    #[test]
    fn test_all_test_files_contain_tests() {
        let tests_dir = Path::new("tests");
        let mut files_without_tests = Vec::new();

        if let Err(error) = check_test_files(tests_dir, &mut files_without_tests) {
            assert!(tests_dir.exists(), "Failed to scan tests directory: {error}");
        }

        assert!(
            files_without_tests.is_empty(),
            "The following test files don't contain any #[test] functions:\n{}",
            files_without_tests.join("\n")
        );
    }

    // Entry points, harness roots and module files carry no tests of their own
    fn is_organization_file(relative_path: &str) -> bool {
        relative_path == "main.rs" || relative_path == "lib.rs" || relative_path.ends_with("mod.rs")
    }

    fn collect_relative_paths(dir: &Path, base: &Path) -> Result<HashSet<String>, io::Error> {
        let mut paths = HashSet::new();

        if dir.is_dir() {
            for entry_result in fs::read_dir(dir)? {
                let path = entry_result?.path();

                let relative_path = match path.strip_prefix(base) {
                    Ok(stripped) => stripped.to_string_lossy().to_string(),
                    Err(_original_error) => {
                        return Err(io::Error::other("Failed to strip prefix"));
                    }
                };

                if path.is_dir() {
                    paths.insert(relative_path);
                    paths.extend(collect_relative_paths(&path, base)?);
                } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                    paths.insert(relative_path);
                }
            }
        }

        Ok(paths)
    }

    fn check_test_files(dir: &Path, files_without_tests: &mut Vec<String>) -> Result<(), io::Error> {
        for entry_result in fs::read_dir(dir)? {
            let path = entry_result?.path();

            if path.is_dir() {
                check_test_files(&path, files_without_tests)?;
            } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                    continue;
                };
                if file_name == "main.rs" || file_name == "mod.rs" {
                    continue;
                }

                let content = fs::read_to_string(&path)?;
                if !content.contains("#[test]") {
                    files_without_tests.push(format!("  - {}", path.display()));
                }
            }
        }

        Ok(())
    }
}
