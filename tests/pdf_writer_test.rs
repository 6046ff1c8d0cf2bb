// PDF構築（JPEG列 → PDF）テスト

use comic_convert::pdf::writer::{PdfImageInput, create_pdf_from_images, write_pdf};

fn image_input(name: &str, width: u16, height: u16, components: u8, data: &[u8]) -> PdfImageInput {
    PdfImageInput {
        name: name.to_owned(),
        width,
        height,
        components,
        data: data.to_vec(),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .rposition(|window| window == needle)
}

/// `startxref`の値と、xrefテーブルに並ぶ全ライブオブジェクトのオフセットを読む。
fn parse_xref(pdf: &[u8]) -> (usize, Vec<usize>) {
    let startxref_pos = rfind(pdf, b"startxref\n").expect("startxref keyword present");
    let after = &pdf[startxref_pos + b"startxref\n".len()..];
    let digits: String = after
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .map(|&b| b as char)
        .collect();
    let xref_pos: usize = digits.parse().expect("startxref offset is numeric");

    let table = &pdf[xref_pos..];
    let header_end = find(table, b"f \n").expect("free-list head entry") + 3;
    let mut offsets = Vec::new();
    let mut cursor = header_end;
    while cursor + 20 <= table.len() && table[cursor].is_ascii_digit() {
        let entry = &table[cursor..cursor + 20];
        assert_eq!(&entry[17..18], b"n", "live entry must be marked 'n'");
        let offset: usize = std::str::from_utf8(&entry[..10])
            .expect("offset is ASCII")
            .parse()
            .expect("offset is numeric");
        offsets.push(offset);
        cursor += 20;
    }
    (xref_pos, offsets)
}

// ============================================================
// 1. 基本構造
// ============================================================

#[test]
fn test_header_and_eof() {
    let mut out = Vec::new();
    write_pdf(&[image_input("p1.jpg", 10, 20, 3, b"\xFF\xD8jpegdata")], &mut out)
        .expect("single page should write");

    assert!(out.starts_with(b"%PDF-1.4\n"), "must start with PDF/1.4 header");
    assert!(out.ends_with(b"%%EOF"), "must end with %%EOF");
}

#[test]
fn test_empty_input_is_rejected() {
    let mut out = Vec::new();
    let result = write_pdf(&[], &mut out);
    assert!(result.is_err(), "zero images is a precondition violation");
    assert!(out.is_empty(), "nothing may be written on failure");
}

#[test]
fn test_page_tree_counts_every_page() {
    let images: Vec<PdfImageInput> = (0..3)
        .map(|i| image_input(&format!("p{i}.jpg"), 100, 200, 3, b"payload"))
        .collect();
    let mut out = Vec::new();
    write_pdf(&images, &mut out).expect("three pages should write");

    assert!(find(&out, b"/Count 3").is_some(), "Pages node must count 3 kids");
    // ページオブジェクトは 3+3i 番
    assert!(find(&out, b"/Kids [ 3 0 R 6 0 R 9 0 R ]").is_some());
    assert!(find(&out, b"/Im1 ").is_some());
    assert!(find(&out, b"/Im3 ").is_some());
}

// ============================================================
// 2. xref 正確性
// ============================================================

#[test]
fn test_xref_offsets_land_on_object_tokens() {
    let images: Vec<PdfImageInput> = (0..4)
        .map(|i| image_input(&format!("p{i}.jpg"), 640, 480, 3, &[0xFF, 0xD8, i as u8]))
        .collect();
    let mut out = Vec::new();
    write_pdf(&images, &mut out).expect("should write");

    let (xref_pos, offsets) = parse_xref(&out);
    assert!(
        out[xref_pos..].starts_with(b"xref\n"),
        "startxref must point at the xref keyword"
    );
    assert_eq!(offsets.len(), 2 + 4 * 3, "xref lists every live object");

    for (index, &offset) in offsets.iter().enumerate() {
        let object_id = index + 1;
        let token = format!("{object_id} 0 obj\n");
        assert!(
            out[offset..].starts_with(token.as_bytes()),
            "object {object_id}: offset {offset} must land exactly on its obj token"
        );
    }
}

// ============================================================
// 3. 画像XObjectと色空間
// ============================================================

#[test]
fn test_color_space_from_component_count() {
    for (components, expected) in [
        (1u8, "/ColorSpace /DeviceGray"),
        (3, "/ColorSpace /DeviceRGB"),
        (4, "/ColorSpace /DeviceCMYK"),
        // 規約: 未知のコンポーネント数はRGB扱い
        (2, "/ColorSpace /DeviceRGB"),
        (0, "/ColorSpace /DeviceRGB"),
    ] {
        let mut out = Vec::new();
        write_pdf(
            &[image_input("p.jpg", 8, 8, components, b"data")],
            &mut out,
        )
        .expect("should write");
        assert!(
            find(&out, expected.as_bytes()).is_some(),
            "components={components} should map to {expected}"
        );
    }
}

#[test]
fn test_jpeg_payload_embedded_byte_identical() {
    let payload: Vec<u8> = (0..=255u8).cycle().take(1024).collect();
    let mut out = Vec::new();
    write_pdf(&[image_input("p.jpg", 64, 64, 3, &payload)], &mut out).expect("should write");

    assert!(find(&out, b"/Filter /DCTDecode").is_some());
    let length_tag = format!("/Length {} >>\nstream\n", payload.len());
    let stream_start =
        find(&out, length_tag.as_bytes()).expect("image stream header") + length_tag.len();
    assert_eq!(
        &out[stream_start..stream_start + payload.len()],
        &payload[..],
        "embedded stream body must be byte-identical to the source JPEG"
    );
    assert!(
        out[stream_start + payload.len()..].starts_with(b"\nendstream\n"),
        "stream body must be followed by endstream"
    );
}

#[test]
fn test_media_box_and_content_stream_use_pixel_units() {
    let mut out = Vec::new();
    write_pdf(&[image_input("p.jpg", 1234, 567, 3, b"x")], &mut out).expect("should write");

    // MediaBoxはピクセル寸法そのまま（DPI換算なし）
    assert!(find(&out, b"/MediaBox [0 0 1234 567]").is_some());
    assert!(find(&out, b"q 1234 0 0 567 0 0 cm /Im1 Do Q").is_some());
}

// ============================================================
// 4. ファイル出力
// ============================================================

#[test]
fn test_create_pdf_makes_parent_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("nested/out/comic.pdf");

    create_pdf_from_images(
        &[image_input("p.jpg", 10, 10, 3, b"\xFF\xD8data")],
        &output,
    )
    .expect("should create parent directories and write");

    let written = std::fs::read(&output).expect("output exists");
    assert!(written.starts_with(b"%PDF-1.4\n"));
    assert!(written.ends_with(b"%%EOF"));
}

#[test]
fn test_create_pdf_with_no_images_leaves_no_usable_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("empty.pdf");

    let result = create_pdf_from_images(&[], &output);
    assert!(result.is_err(), "zero images must fail");
    assert!(!output.exists(), "no partial output file may be left behind");
}
