#[cfg(test)]
pub const POST_DATA: &str = r#"---
draft: false
authors:
  - jane
date:
  created: 2024-05-01 09:30:00
categories:
  - Engineering
tags:
  - rust
  - self-taught-dev
  - github actions
description: How I deploy small Rust services with a single workflow file.
title: Deploying Rust Services Without Tears
series: Shipping Rust
---

main-image: ![cover](https://cdn.example.com/img/cover.png)

A short intro that sits above the fold.

<!-- more -->

## Why bother

Because it is fun :rocket:

!!! warning "Careful"

    Do not run this twice.

### The details

--8<-- "snippets/abbreviations.md"

![diagram](https://cdn.example.com/img/diagram.svg){ width="300" }
<figcaption>How the pieces fit</figcaption>

!!! note

    Plain note body.

Ship it :rocket:
"#;

#[cfg(test)]
pub const POST_NO_MAIN_IMAGE: &str = r#"---
draft: true
authors: [jane]
date:
  created: 2024-05-01
categories: [Engineering]
tags: [rust]
description: Nothing to see.
title: No cover
---

Just text, no cover image.
"#;

#[cfg(test)]
pub const SVG_DATA: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="4"><rect width="4" height="4" fill="red"/></svg>"#;

#[cfg(test)]
pub fn png_bytes() -> Vec<u8> {
    use std::io::Cursor;

    use image::{ImageFormat, Rgba, RgbaImage};

    let img = RgbaImage::from_pixel(3, 2, Rgba([10, 200, 30, 128]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
    buf
}

#[cfg(test)]
fn read_request(stream: &mut std::net::TcpStream) {
    use std::io::{BufRead, BufReader, Read};

    let mut reader = BufReader::new(stream);
    let mut content_length = 0;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            return;
        }
        if line == "\r\n" {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }
    let mut body = vec![0; content_length];
    let _ = reader.read_exact(&mut body);
}

/// Answers a single request with `status` (e.g. `404 Not Found`) and an empty body.
/// Returns the base URL to call.
#[cfg(test)]
pub fn serve_once(status: &'static str) -> String {
    use std::io::Write;
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            read_request(&mut stream);
            let response = format!("HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n", status);
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{}", addr)
}
