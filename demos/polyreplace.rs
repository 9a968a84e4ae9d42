use std::path::PathBuf;
use std::time::Instant;

use polyreplace::{
    audio::{prepare_prompt, read_wav},
    preprocess_tts_text, PluginConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let prompt_path = args.next().map(PathBuf::from);

    let mut config = match config_path {
        Some(path) => PluginConfig::from_json_file(&path)?,
        None => PluginConfig::default(),
    };
    config.polyreplace = true;

    let text = "银行行长在重庆说：你好吗？";
    let start = Instant::now();
    let replaced = preprocess_tts_text(text, &config)?;
    println!("{text} -> {replaced} ({:.2?})", start.elapsed());

    if let Some(path) = prompt_path {
        let clip = read_wav(&path)?;
        let prompt = prepare_prompt(&clip, &config.prompt)?;
        println!(
            "Prompt audio: {:.2}s @ {}Hz -> {:.2}s @ {}Hz",
            clip.duration_secs(),
            clip.sample_rate,
            prompt.duration_secs(),
            prompt.sample_rate
        );
        prompt.write_wav(&PathBuf::from("prompt_16k.wav"))?;
        println!("Saved to prompt_16k.wav");
    }

    Ok(())
}
