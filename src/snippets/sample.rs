//! Starter library written on first run

pub(super) const SAMPLE_LIBRARY: &str = r#"version: 1
snippets:
  - id: ps-list-files
    name: List files by size
    description: PowerShell command to list files sorted by size
    content: |
      Get-ChildItem -Path . -File -Recurse |
      Sort-Object -Property Length -Descending |
      Select-Object -First 20 @{Name="Size(MB)";Expression={[math]::Round($_.Length/1MB,2)}}, FullName
    tags: [powershell, files, disk]
    created: 2025-11-04
    modified: 2025-11-04

  - id: flask-run
    name: Flask development server
    description: Start Flask app with custom port and debug enabled
    content: |
      python -m flask --app {{app_name:app}} run --debug --port {{port:5000}}
    tags: [python, flask, development]
    created: 2025-11-04
    modified: 2025-11-04

  - id: git-uncommit
    name: Undo last commit (keep changes)
    description: Git command to undo last commit but keep changes in working directory
    content: git reset --soft HEAD~1
    tags: [git, version-control]
    created: 2025-11-04
    modified: 2025-11-04

  - id: llm-code-review
    name: Code review prompt
    description: Request detailed code review from LLM
    content: |
      Please review the following code for:
      - Performance issues
      - Security vulnerabilities
      - Code style and readability
      - Edge cases and error handling

      Code:
      ```
      {{code_snippet}}
      ```
    tags: [llm, code-review, ai]
    created: 2025-11-04
    modified: 2025-11-04

  - id: win-reset-network
    name: Reset network adapter
    description: Reset all network settings (requires admin)
    content: |
      ipconfig /release
      ipconfig /renew
      netsh winsock reset catalog
      netsh int ip reset reset.log
    tags: [windows, network, admin]
    created: 2025-11-04
    modified: 2025-11-04

  - id: ps-file-search
    name: Find file by pattern
    description: Search for files matching name pattern, return metadata
    content: |
      Get-ChildItem -Path {{search_path:.}} -Filter {{pattern:*.txt}} -Recurse -ErrorAction SilentlyContinue |
      Select-Object FullName, @{Name="Size(KB)";Expression={[math]::Round($_.Length/1KB,2)}}, LastWriteTime |
      Sort-Object LastWriteTime -Descending
    tags: [powershell, files, search]
    created: 2025-11-04
    modified: 2025-11-04
"#;
