// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Ten-product starter inventory written by `stockbot init`.
pub const SAMPLE_INVENTORY_CSV: &str = "\
ID,Producto,Categoria,Precio,Stock,Proveedor,Descripcion
1,Laptop Dell XPS 13,Computadoras,1200,5,Dell Technologies,\"Laptop ultradelgada con pantalla 13.3\"\" y procesador Intel i7\"
2,Mouse Logitech MX Master 3,Periféricos,99,25,Logitech,Mouse inalámbrico ergonómico con sensor de alta precisión
3,Teclado Mecánico Razer,Periféricos,150,15,Razer,Teclado gaming con switches mecánicos RGB
4,\"Monitor Samsung 27\"\" 4K\",Monitores,350,8,Samsung,Monitor 4K con tecnología HDR y 60Hz
5,Auriculares Sony WH-1000XM4,Audio,280,12,Sony,Auriculares inalámbricos con cancelación de ruido
6,Webcam Logitech C920,Video,80,30,Logitech,Webcam HD 1080p con micrófono integrado
7,Tablet iPad Air,Tablets,600,6,Apple,Tablet con chip M1 y pantalla Liquid Retina
8,Smartphone iPhone 14,Smartphones,800,4,Apple,Smartphone con cámara de 48MP y iOS 16
9,Cargador USB-C 65W,Accesorios,45,50,Anker,Cargador rápido compatible con múltiples dispositivos
10,Disco Duro SSD 1TB,Almacenamiento,120,20,Samsung,SSD NVMe con velocidad de lectura hasta 3500MB/s
";
