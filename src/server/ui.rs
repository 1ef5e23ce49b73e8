//! The browser UI page served at the mount path.
//!
//! A single static HTML page: audio upload, target-language selector, two
//! text fields and three buttons.  Each button posts to its own endpoint
//! independently — no ordering is enforced between them, so "read aloud"
//! before any transcription simply posts empty text and renders nothing.

use crate::translate::TARGET_LANGUAGES;

/// Render the UI page for the given mount path.
pub fn render_page(mount_path: &str) -> String {
    let options: String = TARGET_LANGUAGES
        .iter()
        .map(|l| format!("<option value=\"{}\">{} ({})</option>", l.code, l.name, l.code))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Voxlate</title>
<style>
  body {{ font-family: Arial, sans-serif; background-color: #eaeaea; color: #000; padding: 20px; }}
  .row {{ display: flex; gap: 16px; margin-bottom: 16px; }}
  button {{ background-color: #4CAF50; color: white; border: none; padding: 10px 20px;
            font-size: 16px; cursor: pointer; border-radius: 5px; }}
  button:hover {{ background-color: #45a049; }}
  textarea, select, input {{ border-radius: 5px; border: 1px solid #ccc; padding: 10px;
            font-size: 16px; background-color: #fff; }}
  textarea {{ width: 100%; min-height: 80px; }}
</style>
</head>
<body>
<h1>&#128483; Audio Transcription and Translation</h1>
<p>Upload an audio file and select a target language to get the transcription and translation.</p>

<div class="row">
  <input type="file" id="audio-input" accept=".wav,.mp3,.m4a">
  <select id="language-input">{options}</select>
</div>

<div class="row">
  <textarea id="transcribed-output" placeholder="Transcription" readonly></textarea>
  <textarea id="translated-output" placeholder="Translated Text" readonly></textarea>
</div>

<div class="row">
  <button id="submit-button">Transcribe and Translate</button>
  <button id="tts-transcription-button">Read Transcription</button>
  <button id="tts-translation-button">Read Translated Text</button>
</div>

<div class="row">
  <audio id="transcription-audio" controls></audio>
  <audio id="translated-audio" controls></audio>
</div>

<script>
const base = "{mount_path}";

document.getElementById("submit-button").addEventListener("click", async () => {{
  const file = document.getElementById("audio-input").files[0];
  const form = new FormData();
  if (file) form.append("audio", file);
  form.append("target_language", document.getElementById("language-input").value);
  const resp = await fetch(base + "/api/transcribe", {{ method: "POST", body: form }});
  if (!resp.ok) return;
  const data = await resp.json();
  document.getElementById("transcribed-output").value = data.transcription;
  document.getElementById("translated-output").value = data.translation;
}});

async function speak(sourceId, audioId) {{
  const text = document.getElementById(sourceId).value;
  const resp = await fetch(base + "/api/speak", {{
    method: "POST",
    headers: {{ "Content-Type": "application/json" }},
    body: JSON.stringify({{ text }}),
  }});
  if (resp.status !== 200) return;
  const blob = await resp.blob();
  document.getElementById(audioId).src = URL.createObjectURL(blob);
}}

document.getElementById("tts-transcription-button")
  .addEventListener("click", () => speak("transcribed-output", "transcription-audio"));
document.getElementById("tts-translation-button")
  .addEventListener("click", () => speak("translated-output", "translated-audio"));
</script>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_contains_every_language_option() {
        let page = render_page("/app");
        for lang in TARGET_LANGUAGES {
            assert!(
                page.contains(&format!("value=\"{}\"", lang.code)),
                "missing option for {}",
                lang.code
            );
        }
    }

    #[test]
    fn page_targets_the_mount_path() {
        let page = render_page("/custom");
        assert!(page.contains("const base = \"/custom\";"));
    }
}
