use std::io::{self, BufRead, Write};

/// Ask a yes/no question on stdout, reading the answer from stdin.
pub fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    confirm_with(&mut stdin.lock(), &mut stdout, prompt, default)
}

fn confirm_with<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    default: Option<bool>,
) -> io::Result<bool> {
    let hint = match default {
        Some(true) => "Y/n",
        Some(false) | None => "y/N",
    };
    let mut line = String::new();

    loop {
        write!(output, "{} ({}): ", prompt, hint)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            // stdin closed, nobody is going to answer
            return Ok(default.unwrap_or(false));
        }

        match line.trim().to_uppercase().as_str() {
            "Y" | "YES" => return Ok(true),
            "N" | "NO" => return Ok(false),
            "" => {
                if let Some(default) = default {
                    return Ok(default);
                }
            }
            _ => {}
        }
    }
}
