/// TAP (Test Anything Protocol) v14 report, written to stdout.
pub struct Tap {
    cases: Vec<TapCase>,
}

struct TapCase {
    ok: bool,
    desc: String,
    diagnostics: Option<String>,
}

impl Tap {
    pub fn new() -> Self {
        Tap { cases: Vec::new() }
    }

    pub fn ok(&mut self, desc: impl Into<String>) {
        self.cases.push(TapCase {
            ok: true,
            desc: desc.into(),
            diagnostics: None,
        });
    }

    pub fn not_ok(&mut self, desc: impl Into<String>, diagnostics: impl Into<String>) {
        self.cases.push(TapCase {
            ok: false,
            desc: desc.into(),
            diagnostics: Some(diagnostics.into()),
        });
    }

    pub fn failure_count(&self) -> usize {
        self.cases.iter().filter(|c| !c.ok).count()
    }

    /// Print the report. In quiet mode passing cases are left out but keep
    /// their numbers.
    pub fn finish(self, quiet: bool) {
        println!("TAP version 14");
        println!("1..{}", self.cases.len());
        let mut pass = 0usize;
        for (i, case) in self.cases.iter().enumerate() {
            let n = i + 1;
            if case.ok {
                pass += 1;
                if !quiet {
                    println!("ok {} - {}", n, case.desc);
                }
                continue;
            }
            println!("not ok {} - {}", n, case.desc);
            if let Some(diag) = &case.diagnostics {
                for line in diag.lines() {
                    println!("  # {}", line);
                }
            }
        }
        println!("# tests {}", self.cases.len());
        println!("# pass  {}", pass);
        println!("# fail  {}", self.cases.len() - pass);
    }
}
