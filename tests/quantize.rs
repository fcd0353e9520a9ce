use color_reduce_wasm::{
    CanonicalColor, InitPolicy, QuantizeConfig, QuantizeError, Rgb8, Termination, quantize,
    quantize_detailed, reduce_colors_bytes, reduce_source,
};
use image::{ImageFormat, Rgba, RgbaImage};
use palette::Srgb;

fn gradient(width: u32, height: u32) -> Vec<Rgb8> {
    let mut pixels = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width) as u8;
            let g = (y * 255 / height) as u8;
            let b = ((x + y) * 127 / (width + height)) as u8;
            pixels.push(Srgb::new(r, g, b));
        }
    }
    pixels
}

fn is_canonical(px: &Rgb8) -> bool {
    CanonicalColor::from_rgb(*px).is_some()
}

fn encode_png(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn output_has_input_length_and_canonical_colors() {
    let pixels = gradient(32, 24);
    let out = quantize(&pixels, &QuantizeConfig::default()).unwrap();

    assert_eq!(out.len(), pixels.len());
    assert!(out.iter().all(is_canonical));
}

#[test]
fn empty_input_is_rejected() {
    let result = quantize(&[], &QuantizeConfig::default());
    assert!(matches!(result, Err(QuantizeError::EmptyInput)));
}

#[test]
fn invalid_config_is_rejected_before_clustering() {
    let pixels = gradient(4, 4);
    assert!(matches!(
        quantize(&pixels, &QuantizeConfig::new().clusters(6)),
        Err(QuantizeError::InvalidClusterCount(6))
    ));
    assert!(matches!(
        quantize(&pixels, &QuantizeConfig::new().max_iterations(0)),
        Err(QuantizeError::InvalidMaxIterations)
    ));
}

#[test]
fn all_white_stays_white() {
    let pixels = vec![Srgb::new(255, 255, 255); 100];
    let reduction = quantize_detailed(&pixels, &QuantizeConfig::default()).unwrap();

    assert!(reduction.pixels.iter().all(|&p| p == CanonicalColor::White.rgb()));
    assert_eq!(reduction.table.len(), 5);
    assert_eq!(reduction.clustering.cluster_sizes(), vec![100, 0, 0, 0, 0]);
    assert_eq!(reduction.clustering.termination, Termination::Converged);
}

#[test]
fn all_black_stays_black() {
    let pixels = vec![Srgb::new(0, 0, 0); 64];
    let out = quantize(&pixels, &QuantizeConfig::default()).unwrap();
    assert!(out.iter().all(|&p| p == CanonicalColor::Black.rgb()));
}

#[test]
fn single_pixel_is_accepted() {
    let out = quantize(&[Srgb::new(220, 30, 30)], &QuantizeConfig::default()).unwrap();
    assert_eq!(out, vec![CanonicalColor::Red.rgb()]);
}

#[test]
fn four_samples_four_clusters() {
    let pixels = vec![
        Srgb::new(250, 250, 250),
        Srgb::new(10, 10, 10),
        Srgb::new(200, 10, 10),
        Srgb::new(10, 200, 10),
    ];
    let reduction = quantize_detailed(&pixels, &QuantizeConfig::new().clusters(4)).unwrap();

    let expected_centroids: Vec<[f64; 3]> = pixels
        .iter()
        .map(|p| [f64::from(p.red), f64::from(p.green), f64::from(p.blue)])
        .collect();
    assert_eq!(reduction.clustering.centroids, expected_centroids);
    assert_eq!(
        reduction.table.as_slice(),
        &[
            CanonicalColor::White,
            CanonicalColor::Black,
            CanonicalColor::Red,
            CanonicalColor::Green,
        ]
    );
    assert_eq!(
        reduction.pixels,
        vec![
            CanonicalColor::White.rgb(),
            CanonicalColor::Black.rgb(),
            CanonicalColor::Red.rgb(),
            CanonicalColor::Green.rgb(),
        ]
    );
}

#[test]
fn five_color_blocks_map_to_their_colors() {
    let blocks = [
        (Srgb::new(240, 240, 235), CanonicalColor::White),
        (Srgb::new(15, 12, 20), CanonicalColor::Black),
        (Srgb::new(210, 40, 30), CanonicalColor::Red),
        (Srgb::new(30, 190, 40), CanonicalColor::Green),
        (Srgb::new(20, 40, 200), CanonicalColor::Blue),
    ];
    let mut pixels = Vec::new();
    for (color, _) in &blocks {
        pixels.extend(std::iter::repeat_n(*color, 20));
    }

    let out = quantize(&pixels, &QuantizeConfig::default()).unwrap();
    for (i, (_, expected)) in blocks.iter().enumerate() {
        for px in &out[i * 20..(i + 1) * 20] {
            assert_eq!(*px, expected.rgb());
        }
    }
}

#[test]
fn quantize_is_deterministic() {
    let pixels = gradient(40, 30);
    for init in [InitPolicy::FarthestPoint, InitPolicy::FirstDistinct] {
        let config = QuantizeConfig::new().init(init);
        let a = quantize(&pixels, &config).unwrap();
        let b = quantize(&pixels, &config).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn requantizing_stays_in_canonical_domain() {
    let pixels = gradient(20, 20);
    let once = quantize(&pixels, &QuantizeConfig::default()).unwrap();
    let twice = quantize(&once, &QuantizeConfig::default()).unwrap();

    assert_eq!(twice.len(), pixels.len());
    assert!(twice.iter().all(is_canonical));
}

#[test]
fn iteration_cap_is_not_an_error() {
    let pixels = gradient(16, 16);
    let reduction = quantize_detailed(&pixels, &QuantizeConfig::new().max_iterations(1)).unwrap();

    assert_eq!(reduction.clustering.iterations, 1);
    assert_eq!(reduction.clustering.termination, Termination::IterationCap);
    assert!(reduction.pixels.iter().all(is_canonical));
}

#[test]
fn reduce_source_writes_back_and_keeps_alpha() {
    let mut img = RgbaImage::from_fn(8, 8, |x, y| {
        let alpha = if x == 0 { 0 } else { 200 };
        if y < 4 {
            Rgba([230, 235, 240, alpha])
        } else {
            Rgba([20, 30, 190, alpha])
        }
    });
    let reduction = reduce_source(&mut img, &QuantizeConfig::default()).unwrap();

    assert_eq!(reduction.pixels.len(), 64);
    for (x, y, px) in img.enumerate_pixels() {
        let expected: [u8; 3] = if y < 4 { [255, 255, 255] } else { [0, 0, 255] };
        assert_eq!(&px.0[..3], &expected);
        assert_eq!(px.0[3], if x == 0 { 0 } else { 200 });
    }
}

#[test]
fn png_round_trip() {
    let img = RgbaImage::from_fn(12, 6, |x, _| {
        if x < 6 {
            Rgba([200, 20, 20, 255])
        } else {
            Rgba([10, 10, 10, 255])
        }
    });
    let (png, reduction) = reduce_colors_bytes(&encode_png(&img), &QuantizeConfig::default()).unwrap();

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (12, 6));
    for (x, _, px) in decoded.enumerate_pixels() {
        let expected = if x < 6 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 0, 255]) };
        assert_eq!(*px, expected);
    }
    assert_eq!(reduction.table.len(), 5);
}

#[test]
fn corrupt_bytes_are_a_decode_error() {
    let result = reduce_colors_bytes(&[0xFF, 0xFE, 0x00, 0x01], &QuantizeConfig::default());
    assert!(matches!(result, Err(QuantizeError::ImageDecode(_))));
}
